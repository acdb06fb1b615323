use std::{future::Future, pin::Pin};

use crate::errors::IndexError;

/// Provider interface for embedding generation.
///
/// Implementations must be deterministic for a fixed model/config and return
/// vectors of exactly [`EmbeddingsProvider::dim`] elements. Async because
/// most real providers perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;

    /// Output dimensionality.
    fn dim(&self) -> usize;

    /// Stable identifier recorded in the persisted index, e.g. `hashing-v1`.
    fn model_id(&self) -> String;
}

pub mod hashing;
#[cfg(feature = "local-embeddings")]
pub mod local;
pub mod service;

pub use hashing::HashingEmbedder;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedder;
pub use service::ServiceEmbedder;
