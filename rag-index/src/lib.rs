//! Index side of the website question-answering backend.
//!
//! Corpus text is loaded once, split into overlapping [`Document`]s, embedded
//! and stored in an exact [`VectorIndex`] that is persisted to disk so later
//! starts skip re-embedding. [`IndexBootstrap`] owns that load-or-rebuild
//! decision.

pub mod bootstrap;
pub mod chunker;
pub mod config;
pub mod corpus;
pub mod distance;
pub mod embed;
pub mod embed_pool;
pub mod errors;
pub mod index;
pub mod persist;
pub mod progress;
pub mod record;

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;

pub use bootstrap::{BootstrapReport, IndexBootstrap, IndexSource};
pub use chunker::{Chunker, ChunkerConfig};
pub use config::{EmbedderKind, IndexConfig};
pub use corpus::{Corpus, CorpusSource, FileCorpus, StaticCorpus};
pub use distance::DistanceMetric;
#[cfg(feature = "local-embeddings")]
pub use embed::LocalEmbedder;
pub use embed::{EmbeddingsProvider, HashingEmbedder, ServiceEmbedder};
pub use errors::{IndexError, Result};
pub use index::VectorIndex;
pub use persist::IndexFingerprint;
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use record::{Document, IndexEntry, ScoredDocument};

/// Creates the embedder selected by `cfg.embedder`.
///
/// # Errors
/// - [`IndexError::Config`] if the service embedder is selected without `svc`,
///   or the local one in a build without the `local-embeddings` feature
/// - [`IndexError::ModelUnavailable`] if the embedding backend is unreachable
pub async fn connect_embedder(
    cfg: &IndexConfig,
    svc: Option<Arc<LlmServiceProfiles>>,
) -> Result<Arc<dyn EmbeddingsProvider>> {
    match cfg.embedder {
        EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(
            cfg.embedding_dim.unwrap_or(embed::hashing::DEFAULT_DIM),
        )?)),
        EmbedderKind::Service => {
            let svc = svc.ok_or_else(|| {
                IndexError::Config("EMBEDDER_KIND=service requires LLM service profiles".into())
            })?;
            Ok(Arc::new(ServiceEmbedder::connect(svc, cfg.embedding_dim).await?))
        }
        #[cfg(feature = "local-embeddings")]
        EmbedderKind::Local => Ok(Arc::new(LocalEmbedder::load(cfg.embedding_dim).await?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbedderKind::Local => Err(IndexError::Config(
            "EMBEDDER_KIND=local needs a build with the `local-embeddings` feature".into(),
        )),
    }
}
