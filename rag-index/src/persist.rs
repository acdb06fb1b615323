//! On-disk index format.
//!
//! A single JSON document:
//!
//! ```json
//! { "format": "site-rag-index", "version": 1, "dimension": 384,
//!   "metric": "cosine", "fingerprint": { ... }, "entries": [ ... ] }
//! ```
//!
//! Writes go to `<path>.tmp` and are renamed into place, so a crash never
//! leaves a half-written index under the real name.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::distance::DistanceMetric;
use crate::errors::{IndexError, Result};
use crate::index::VectorIndex;
use crate::record::IndexEntry;

pub const INDEX_FORMAT: &str = "site-rag-index";
pub const INDEX_VERSION: u32 = 1;

/// Everything the persisted vectors depend on. A stored index is only reused
/// when its fingerprint equals the one computed for the running config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFingerprint {
    pub embedder_model: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// blake3 hex digest of the corpus text.
    pub corpus_digest: String,
}

#[derive(Serialize)]
struct PersistedIndexRef<'a> {
    format: &'a str,
    version: u32,
    dimension: usize,
    metric: DistanceMetric,
    fingerprint: &'a IndexFingerprint,
    entries: &'a [IndexEntry],
}

#[derive(Deserialize)]
struct PersistedIndex {
    format: String,
    version: u32,
    dimension: usize,
    metric: DistanceMetric,
    fingerprint: IndexFingerprint,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Serializes the index and its documents to `path`.
    ///
    /// # Errors
    /// [`IndexError::Io`] or [`IndexError::Serialize`] on write failures.
    pub fn persist(&self, path: &Path, fingerprint: &IndexFingerprint) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
        }

        let tmp = tmp_path(path);
        let file = File::create(&tmp).map_err(|e| IndexError::io(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(
            &mut writer,
            &PersistedIndexRef {
                format: INDEX_FORMAT,
                version: INDEX_VERSION,
                dimension: self.dimension(),
                metric: self.metric(),
                fingerprint,
                entries: self.entries(),
            },
        )?;
        writer.flush().map_err(|e| IndexError::io(&tmp, e))?;
        drop(writer);

        std::fs::rename(&tmp, path).map_err(|e| IndexError::io(path, e))?;
        info!(path = %path.display(), entries = self.len(), "index persisted");
        Ok(())
    }

    /// Reads an index written by [`VectorIndex::persist`].
    ///
    /// # Errors
    /// [`IndexError::CorruptIndex`] if the file cannot be read or parsed, or
    /// its format, version, dimension, metric, fingerprint or any vector
    /// length disagrees with `expected`.
    pub fn load(path: &Path, expected: &IndexFingerprint) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| IndexError::corrupt(path, format!("cannot open: {e}")))?;
        let stored: PersistedIndex = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| IndexError::corrupt(path, format!("cannot parse: {e}")))?;

        if stored.format != INDEX_FORMAT {
            return Err(IndexError::corrupt(
                path,
                format!("unexpected format `{}`", stored.format),
            ));
        }
        if stored.version != INDEX_VERSION {
            return Err(IndexError::corrupt(
                path,
                format!("unsupported version {}", stored.version),
            ));
        }
        if stored.dimension != expected.dimension {
            return Err(IndexError::corrupt(
                path,
                format!(
                    "dimension {} does not match embedder dimension {}",
                    stored.dimension, expected.dimension
                ),
            ));
        }
        if stored.metric != expected.metric {
            return Err(IndexError::corrupt(
                path,
                format!(
                    "metric {} does not match configured metric {}",
                    stored.metric, expected.metric
                ),
            ));
        }
        if stored.fingerprint != *expected {
            debug!(stored = ?stored.fingerprint, ?expected, "fingerprint mismatch");
            return Err(IndexError::corrupt(
                path,
                "built from a different corpus, chunking or embedder",
            ));
        }

        VectorIndex::build(stored.entries, stored.dimension, stored.metric).map_err(|e| match e {
            IndexError::DimensionMismatch { got, want } => {
                IndexError::corrupt(path, format!("entry of length {got}, expected {want}"))
            }
            other => IndexError::corrupt(path, other.to_string()),
        })
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".tmp");
    PathBuf::from(s)
}
