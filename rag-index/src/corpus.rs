//! Corpus loading. The text is read once and shared read-only afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::errors::{IndexError, Result};

/// Anything that can hand over the raw corpus text.
pub trait CorpusSource: Send + Sync {
    fn read(&self) -> Result<String>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// UTF-8 text file on disk.
#[derive(Debug, Clone)]
pub struct FileCorpus {
    path: PathBuf,
}

impl FileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for FileCorpus {
    fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| IndexError::io(&self.path, e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory corpus.
#[derive(Debug, Clone)]
pub struct StaticCorpus(pub String);

impl CorpusSource for StaticCorpus {
    fn read(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "<static>".to_string()
    }
}

/// Loaded corpus text plus its content digest.
#[derive(Debug, Clone)]
pub struct Corpus {
    text: Arc<str>,
    digest: String,
}

impl Corpus {
    /// Reads the source once.
    ///
    /// # Errors
    /// Propagates the source error (e.g. [`IndexError::Io`] for a missing file).
    pub fn load(source: &dyn CorpusSource) -> Result<Self> {
        let text = source.read()?;
        let corpus = Self::from_text(text);
        info!(
            source = %source.describe(),
            chars = corpus.text.chars().count(),
            digest = %&corpus.digest[..12],
            "corpus loaded"
        );
        Ok(corpus)
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let digest = blake3::hash(text.as_bytes()).to_hex().to_string();
        Self {
            text: Arc::from(text),
            digest,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// blake3 hex digest of the text.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_corpus_reads_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.txt");
        std::fs::write(&path, "Welcome to our ISP.").unwrap();

        let corpus = Corpus::load(&FileCorpus::new(&path)).unwrap();
        assert_eq!(corpus.text(), "Welcome to our ISP.");
        assert_eq!(corpus.digest().len(), 64);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Corpus::load(&FileCorpus::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[test]
    fn digest_tracks_content() {
        let a = Corpus::from_text("same");
        let b = Corpus::load(&StaticCorpus("same".into())).unwrap();
        let c = Corpus::from_text("different");
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }
}
