//! Startup path for the vector index: reuse the persisted copy when it is
//! valid for the running config, rebuild from the corpus otherwise.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::chunker::Chunker;
use crate::corpus::Corpus;
use crate::distance::DistanceMetric;
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_documents;
use crate::errors::{IndexError, Result};
use crate::index::VectorIndex;
use crate::persist::IndexFingerprint;
use crate::progress::Progress;

/// Where the served index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexSource {
    /// Read from disk.
    Loaded,
    /// No persisted index existed.
    Built,
    /// The persisted index was corrupt or incompatible.
    Rebuilt,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub source: IndexSource,
    pub entries: usize,
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
pub struct IndexBootstrap {
    index_path: PathBuf,
    metric: DistanceMetric,
    concurrency: usize,
}

impl IndexBootstrap {
    pub fn new(index_path: impl Into<PathBuf>, metric: DistanceMetric, concurrency: usize) -> Self {
        Self {
            index_path: index_path.into(),
            metric,
            concurrency: concurrency.max(1),
        }
    }

    /// Fingerprint the persisted index must carry to be reused.
    pub fn fingerprint(
        &self,
        corpus: &Corpus,
        chunker: &Chunker,
        embedder: &dyn EmbeddingsProvider,
    ) -> IndexFingerprint {
        let cfg = chunker.config();
        IndexFingerprint {
            embedder_model: embedder.model_id(),
            dimension: embedder.dim(),
            metric: self.metric,
            chunk_size: cfg.chunk_size,
            chunk_overlap: cfg.chunk_overlap,
            corpus_digest: corpus.digest().to_string(),
        }
    }

    /// Loads the persisted index or rebuilds it.
    ///
    /// A corrupt or incompatible file triggers a rebuild rather than an error.
    /// A failed persist after a rebuild is logged and the in-memory index is
    /// still returned.
    ///
    /// # Errors
    /// Embedding failures during a rebuild (e.g. [`IndexError::ModelUnavailable`]).
    pub async fn load_or_build(
        &self,
        corpus: &Corpus,
        chunker: &Chunker,
        embedder: &dyn EmbeddingsProvider,
        progress: &dyn Progress,
    ) -> Result<(VectorIndex, BootstrapReport)> {
        let started = Instant::now();
        let fingerprint = self.fingerprint(corpus, chunker, embedder);

        let source = if self.index_path.exists() {
            match VectorIndex::load(&self.index_path, &fingerprint) {
                Ok(index) => {
                    let report = BootstrapReport {
                        source: IndexSource::Loaded,
                        entries: index.len(),
                        duration_ms: started.elapsed().as_millis(),
                    };
                    info!(
                        path = %self.index_path.display(),
                        entries = report.entries,
                        "persisted index loaded"
                    );
                    progress.finish("index loaded");
                    return Ok((index, report));
                }
                Err(err @ IndexError::CorruptIndex { .. }) => {
                    warn!(error = %err, "persisted index unusable; rebuilding from corpus");
                    IndexSource::Rebuilt
                }
                Err(other) => return Err(other),
            }
        } else {
            info!(path = %self.index_path.display(), "no persisted index; building");
            IndexSource::Built
        };

        let index = self.build(corpus, chunker, embedder, progress).await?;
        if let Err(err) = index.persist(&self.index_path, &fingerprint) {
            error!(error = %err, "failed to persist index; serving in-memory copy");
        }

        let report = BootstrapReport {
            source,
            entries: index.len(),
            duration_ms: started.elapsed().as_millis(),
        };
        progress.finish("index ready");
        info!(
            source = ?report.source,
            entries = report.entries,
            duration_ms = report.duration_ms,
            "index ready"
        );
        Ok((index, report))
    }

    /// Chunk, embed and build without touching the disk.
    pub async fn build(
        &self,
        corpus: &Corpus,
        chunker: &Chunker,
        embedder: &dyn EmbeddingsProvider,
        progress: &dyn Progress,
    ) -> Result<VectorIndex> {
        progress.message("chunking corpus");
        let docs = chunker.chunk(corpus.text());
        info!(chunks = docs.len(), "corpus chunked");

        let entries = embed_documents(docs, embedder, self.concurrency, progress).await?;
        VectorIndex::build(entries, embedder.dim(), self.metric)
    }
}
