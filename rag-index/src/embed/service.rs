//! Remote embedding provider backed by `ai-llm-service`.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;
use tracing::{info, warn};

use crate::embed::EmbeddingsProvider;
use crate::errors::{IndexError, Result};

/// Embeds through the embedding profile of [`LlmServiceProfiles`]
/// (Ollama or OpenAI, decided by configuration).
#[derive(Debug, Clone)]
pub struct ServiceEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
    model_id: String,
}

impl ServiceEmbedder {
    /// Verifies that the backend is reachable and serves the model, then
    /// learns the output dimensionality from a probe embedding.
    ///
    /// # Errors
    /// - [`IndexError::ModelUnavailable`] if the backend or model is missing
    /// - [`IndexError::DimensionMismatch`] if `expected_dim` is set and differs
    pub async fn connect(svc: Arc<LlmServiceProfiles>, expected_dim: Option<usize>) -> Result<Self> {
        let status = svc
            .probe_embedding()
            .await
            .map_err(|e| IndexError::ModelUnavailable(e.to_string()))?;
        if !status.ok {
            return Err(IndexError::ModelUnavailable(status.message));
        }

        let probe = svc
            .embed("dimension probe")
            .await
            .map_err(|e| IndexError::ModelUnavailable(e.to_string()))?;
        let dim = probe.len();
        if let Some(want) = expected_dim {
            if want != dim {
                return Err(IndexError::DimensionMismatch { got: dim, want });
            }
        }

        let (_, profile) = svc.profiles();
        let model_id = format!("{}:{}", profile.provider, profile.model);
        info!(model = %model_id, dim, "embedding backend ready");

        Ok(Self { svc, dim, model_id })
    }
}

impl EmbeddingsProvider for ServiceEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>> {
        Box::pin(async move {
            let v = self.svc.embed(text).await.map_err(|e| {
                warn!(error = %e, unreachable = e.is_unreachable(), "embedding call failed");
                IndexError::ModelUnavailable(e.to_string())
            })?;

            if v.len() != self.dim {
                return Err(IndexError::DimensionMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }
            Ok(v)
        })
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }
}
