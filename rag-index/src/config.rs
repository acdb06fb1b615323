//! Index configuration loaded from environment variables.
//!
//! | Variable                | Default                    |
//! |-------------------------|----------------------------|
//! | `CORPUS_PATH`           | `data/website_content.txt` |
//! | `INDEX_PATH`            | `data/index.json`          |
//! | `CHUNK_SIZE`            | `500`                      |
//! | `CHUNK_OVERLAP`         | `50`                       |
//! | `INDEX_METRIC`          | `cosine`                   |
//! | `EMBEDDER_KIND`         | `hashing`                  |
//! | `EMBEDDING_DIM`         | `384` for hashing and local, probed for service |
//! | `EMBEDDING_CONCURRENCY` | `4`                        |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::chunker::ChunkerConfig;
use crate::distance::DistanceMetric;
use crate::errors::{IndexError, Result};

/// Which embedder produces index and query vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Feature hashing, no model needed.
    Hashing,
    /// all-MiniLM-L6-v2 in process (`local-embeddings` feature).
    Local,
    /// Embedding profile of `ai-llm-service`.
    Service,
}

impl FromStr for EmbedderKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(EmbedderKind::Hashing),
            "local" | "minilm" | "fastembed" => Ok(EmbedderKind::Local),
            "service" | "remote" => Ok(EmbedderKind::Service),
            other => Err(IndexError::Config(format!("unknown EMBEDDER_KIND: {other}"))),
        }
    }
}

impl fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedderKind::Hashing => f.write_str("hashing"),
            EmbedderKind::Local => f.write_str("local"),
            EmbedderKind::Service => f.write_str("service"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub corpus_path: PathBuf,
    pub index_path: PathBuf,
    pub chunker: ChunkerConfig,
    pub metric: DistanceMetric,
    pub embedder: EmbedderKind,
    /// Required vector width; `None` lets the service embedder report its own.
    pub embedding_dim: Option<usize>,
    pub embedding_concurrency: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("data/website_content.txt"),
            index_path: PathBuf::from("data/index.json"),
            chunker: ChunkerConfig::default(),
            metric: DistanceMetric::Cosine,
            embedder: EmbedderKind::Hashing,
            embedding_dim: None,
            embedding_concurrency: 4,
        }
    }
}

impl IndexConfig {
    /// Reads the environment on top of [`IndexConfig::default`].
    ///
    /// # Errors
    /// [`IndexError::Config`] for unknown enum values or inconsistent sizes.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let cfg = Self {
            corpus_path: env_opt("CORPUS_PATH").map(PathBuf::from).unwrap_or(d.corpus_path),
            index_path: env_opt("INDEX_PATH").map(PathBuf::from).unwrap_or(d.index_path),
            chunker: ChunkerConfig {
                chunk_size: parse("CHUNK_SIZE", d.chunker.chunk_size),
                chunk_overlap: parse("CHUNK_OVERLAP", d.chunker.chunk_overlap),
            },
            metric: env_opt("INDEX_METRIC")
                .map(|s| s.parse::<DistanceMetric>())
                .transpose()?
                .unwrap_or(d.metric),
            embedder: env_opt("EMBEDDER_KIND")
                .map(|s| s.parse::<EmbedderKind>())
                .transpose()?
                .unwrap_or(d.embedder),
            embedding_dim: env_opt("EMBEDDING_DIM").and_then(|v| v.parse().ok()),
            embedding_concurrency: parse("EMBEDDING_CONCURRENCY", d.embedding_concurrency),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunker.validate()?;
        if self.embedding_dim == Some(0) {
            return Err(IndexError::Config("EMBEDDING_DIM must be > 0".into()));
        }
        if self.embedding_concurrency == 0 {
            return Err(IndexError::Config("EMBEDDING_CONCURRENCY must be > 0".into()));
        }
        Ok(())
    }
}

fn env_opt(k: &str) -> Option<String> {
    std::env::var(k)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(k: &str, dflt: T) -> T {
    env_opt(k).and_then(|v| v.parse().ok()).unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_500_50_hashing() {
        let cfg = IndexConfig::default();
        assert_eq!(cfg.chunker.chunk_size, 500);
        assert_eq!(cfg.chunker.chunk_overlap, 50);
        assert_eq!(cfg.embedder, EmbedderKind::Hashing);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_sizes() {
        let mut cfg = IndexConfig::default();
        cfg.chunker.chunk_overlap = 600;
        assert!(matches!(cfg.validate(), Err(IndexError::Config(_))));

        let mut cfg = IndexConfig::default();
        cfg.embedding_concurrency = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parses_embedder_kind() {
        assert_eq!("Service".parse::<EmbedderKind>().unwrap(), EmbedderKind::Service);
        assert_eq!("minilm".parse::<EmbedderKind>().unwrap(), EmbedderKind::Local);
        assert_eq!("hashing".parse::<EmbedderKind>().unwrap(), EmbedderKind::Hashing);
        assert!("onnx".parse::<EmbedderKind>().is_err());
    }
}
