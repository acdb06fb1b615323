//! Completion capability and the answer generator built on it.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;
use tracing::{debug, warn};

use crate::error::PipelineError;

/// Provider interface for text completion.
///
/// Swapping providers must not change pipeline logic, so the pipeline only
/// ever sees this trait.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + 'a>>;
}

/// Chat profile of [`LlmServiceProfiles`] as a [`CompletionProvider`].
///
/// The prompt already carries persona and rules, so no separate system
/// message is sent.
#[derive(Debug, Clone)]
pub struct ServiceCompleter {
    svc: Arc<LlmServiceProfiles>,
}

impl ServiceCompleter {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl CompletionProvider for ServiceCompleter {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + 'a>> {
        Box::pin(async move {
            self.svc.generate(prompt, None).await.map_err(|e| {
                warn!(error = %e, unreachable = e.is_unreachable(), "completion failed");
                PipelineError::GenerationUnavailable(e.to_string())
            })
        })
    }
}

pub struct AnswerGenerator {
    provider: Arc<dyn CompletionProvider>,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Trimmed completion for `prompt`.
    ///
    /// # Errors
    /// [`PipelineError::GenerationUnavailable`] on backend failure or an
    /// empty completion.
    pub async fn generate(&self, prompt: &str) -> Result<String, PipelineError> {
        let raw = self.provider.complete(prompt).await?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(PipelineError::GenerationUnavailable(
                "model returned an empty completion".into(),
            ));
        }
        debug!(answer_len = text.len(), "answer generated");
        Ok(text.to_string())
    }
}
