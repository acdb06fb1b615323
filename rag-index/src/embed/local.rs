//! In-process sentence embeddings with all-MiniLM-L6-v2 (ONNX, via `fastembed`).
//!
//! The model files are fetched into the fastembed cache on first load.

use std::sync::{Arc, Mutex};
use std::{future::Future, pin::Pin};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::embed::EmbeddingsProvider;
use crate::errors::{IndexError, Result};

/// Output width of all-MiniLM-L6-v2.
pub const MINILM_DIM: usize = 384;

const MODEL_ID: &str = "fastembed:all-MiniLM-L6-v2";

/// Local all-MiniLM-L6-v2 embedder. Inference runs on the blocking pool.
#[derive(Clone)]
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Loads (and on first use downloads) the model.
    ///
    /// # Errors
    /// - [`IndexError::DimensionMismatch`] if `expected_dim` is not 384
    /// - [`IndexError::ModelUnavailable`] if the model cannot be fetched or loaded
    pub async fn load(expected_dim: Option<usize>) -> Result<Self> {
        if let Some(want) = expected_dim {
            if want != MINILM_DIM {
                return Err(IndexError::DimensionMismatch {
                    got: MINILM_DIM,
                    want,
                });
            }
        }

        let model = tokio::task::spawn_blocking(|| {
            TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                    .with_show_download_progress(false),
            )
        })
        .await
        .map_err(|e| IndexError::ModelUnavailable(format!("model loader panicked: {e}")))?
        .map_err(|e| IndexError::ModelUnavailable(format!("cannot load all-MiniLM-L6-v2: {e}")))?;

        info!(model = MODEL_ID, dim = MINILM_DIM, "local embedding model ready");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl EmbeddingsProvider for LocalEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>> {
        let model = Arc::clone(&self.model);
        let text = text.to_owned();
        Box::pin(async move {
            let mut batch = tokio::task::spawn_blocking(move || {
                #[allow(unused_mut)]
                let mut guard = model
                    .lock()
                    .map_err(|_| IndexError::ModelUnavailable("local model lock poisoned".into()))?;
                guard
                    .embed(vec![text], None)
                    .map_err(|e| IndexError::ModelUnavailable(e.to_string()))
            })
            .await
            .map_err(|e| IndexError::ModelUnavailable(format!("inference task failed: {e}")))??;

            let v = batch.pop().ok_or_else(|| {
                IndexError::ModelUnavailable("model returned no embedding".into())
            })?;
            if v.len() != MINILM_DIM {
                return Err(IndexError::DimensionMismatch {
                    got: v.len(),
                    want: MINILM_DIM,
                });
            }
            Ok(v)
        })
    }

    fn dim(&self) -> usize {
        MINILM_DIM
    }

    fn model_id(&self) -> String {
        MODEL_ID.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{DistanceMetric, magnitude};

    #[tokio::test]
    async fn rejects_a_configured_width_other_than_384() {
        let err = LocalEmbedder::load(Some(4096)).await.err();
        assert!(matches!(
            err,
            Some(IndexError::DimensionMismatch { got: 384, want: 4096 })
        ));
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2"]
    async fn related_sentences_are_closer() {
        let e = LocalEmbedder::load(None).await.unwrap();
        let q = e.embed("How much does the premium plan cost?").await.unwrap();
        let near = e.embed("Plan B costs $20 per month.").await.unwrap();
        let far = e.embed("The office is closed on Sundays.").await.unwrap();
        assert_eq!(q.len(), MINILM_DIM);
        let d = |v: &[f32]| DistanceMetric::Cosine.distance(&q, magnitude(&q), v, magnitude(v));
        assert!(d(&near) < d(&far));
    }
}
