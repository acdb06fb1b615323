//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across `rag-index`.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Top-level error for indexing operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Corpus or index file could not be read or written.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Embedding backend or model cannot be reached or loaded.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// A vector does not have the index dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    /// Persisted index is unreadable or incompatible with the running config.
    #[error("corrupt index at {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    /// Serialization failure while writing the index.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IndexError::CorruptIndex {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
