//! Shared model service with two profiles: `chat` and `embedding`.
//!
//! - Construct once, wrap in `Arc`, hand clones to dependents.
//! - HTTP clients are built eagerly so a broken profile fails at startup.
//! - `embed` and `generate` are provider-agnostic.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::env_config::{chat_config_from_env, embedding_config_from_env};
//!
//! # async fn run() -> ai_llm_service::Result<()> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     chat_config_from_env()?,
//!     embedding_config_from_env()?,
//!     Some(10),
//! )?);
//!
//! let vector = svc.embed("opening hours").await?;
//! let text = svc.generate("Say hi", None).await?;
//! println!("{} dims, {text}", vector.len());
//! # Ok(())
//! # }
//! ```

use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::Result,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

#[derive(Debug)]
enum ModelClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl ModelClient {
    fn new(cfg: &LlmModelConfig) -> Result<Self> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => ModelClient::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => ModelClient::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }
}

/// Chat and embedding profiles behind one handle.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,
    chat_client: ModelClient,
    embedding_client: ModelClient,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Builds both clients and the health checker.
    ///
    /// # Errors
    /// Returns [`crate::AiLlmError`] if a config is invalid or a client
    /// cannot be constructed.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self> {
        chat.validate()?;
        embedding.validate()?;

        let chat_client = ModelClient::new(&chat)?;
        let embedding_client = ModelClient::new(&embedding)?;

        info!(
            chat_provider = %chat.provider,
            chat_model = %chat.model,
            embedding_provider = %embedding.provider,
            embedding_model = %embedding.model,
            "LLM profiles initialized"
        );

        Ok(Self {
            chat,
            embedding,
            chat_client,
            embedding_client,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Completion on the chat profile.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        match &self.chat_client {
            ModelClient::Ollama(cli) => cli.generate(prompt, system).await,
            ModelClient::OpenAI(cli) => cli.generate(prompt, system).await,
        }
    }

    /// Embedding on the embedding profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        match &self.embedding_client {
            ModelClient::Ollama(cli) => cli.embeddings(input).await,
            ModelClient::OpenAI(cli) => cli.embeddings(input).await,
        }
    }

    /// Strict probe of the embedding backend, used before building an index.
    pub async fn probe_embedding(&self) -> Result<HealthStatus> {
        self.health.probe(&self.embedding).await
    }

    /// Health for each distinct profile; identical profiles are checked once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = vec![self.chat.clone()];
        if self.embedding != self.chat {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }
}
