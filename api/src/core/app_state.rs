use std::net::SocketAddr;
use std::sync::Arc;

use ai_llm_service::{
    LlmServiceProfiles,
    config::env_config::{chat_config_from_env, embedding_config_from_env},
};
use rag_answer::{AnswerConfig, AnswerMode, RagPipeline};
use rag_index::{EmbedderKind, IndexConfig};
use tokio::sync::RwLock;

use crate::error_handler::AppError;

const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8080";
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: SocketAddr,
    pub index: IndexConfig,
    pub answer: AnswerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let raw = std::env::var("API_ADDRESS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());
        let address = raw
            .parse()
            .map_err(|_| AppError::Config(format!("API_ADDRESS is not host:port: {raw}")))?;

        let index = IndexConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
        let answer =
            AnswerConfig::from_env_for(index.metric).map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self {
            address,
            index,
            answer,
        })
    }

    /// Extractive answering over hashed vectors runs without any model.
    pub fn needs_llm(&self) -> bool {
        self.answer.mode != AnswerMode::Extractive || self.index.embedder == EmbedderKind::Service
    }

    /// Chat and embedding profiles, or `None` if no model is needed.
    /// With an in-process embedder the embedding profile mirrors the chat one.
    pub fn llm_profiles(&self) -> Result<Option<Arc<LlmServiceProfiles>>, AppError> {
        if !self.needs_llm() {
            return Ok(None);
        }
        let llm_err = |e: ai_llm_service::AiLlmError| AppError::Config(e.to_string());

        let chat = chat_config_from_env().map_err(llm_err)?;
        let embedding = match self.index.embedder {
            EmbedderKind::Service => embedding_config_from_env().map_err(llm_err)?,
            EmbedderKind::Hashing | EmbedderKind::Local => chat.clone(),
        };
        let profiles =
            LlmServiceProfiles::new(chat, embedding, Some(HEALTH_TIMEOUT_SECS)).map_err(llm_err)?;
        Ok(Some(Arc::new(profiles)))
    }
}

/// Lifecycle of the pipeline behind the HTTP surface.
#[derive(Clone)]
pub enum Readiness {
    WarmingUp,
    Ready(Arc<RagPipeline>),
    Failed(String),
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Model profiles, reported by `GET /health`.
    pub llm: Option<Arc<LlmServiceProfiles>>,
    readiness: RwLock<Readiness>,
}

impl AppState {
    pub fn warming_up(llm: Option<Arc<LlmServiceProfiles>>) -> Self {
        Self {
            llm,
            readiness: RwLock::new(Readiness::WarmingUp),
        }
    }

    pub fn ready(pipeline: Arc<RagPipeline>, llm: Option<Arc<LlmServiceProfiles>>) -> Self {
        Self {
            llm,
            readiness: RwLock::new(Readiness::Ready(pipeline)),
        }
    }

    pub async fn readiness(&self) -> Readiness {
        self.readiness.read().await.clone()
    }

    /// The pipeline, or the error to answer with while it is unavailable.
    pub async fn pipeline(&self) -> Result<Arc<RagPipeline>, AppError> {
        match &*self.readiness.read().await {
            Readiness::Ready(p) => Ok(p.clone()),
            Readiness::WarmingUp => Err(AppError::WarmingUp),
            Readiness::Failed(reason) => Err(AppError::IndexUnavailable(reason.clone())),
        }
    }

    pub async fn set_ready(&self, pipeline: Arc<RagPipeline>) {
        *self.readiness.write().await = Readiness::Ready(pipeline);
    }

    pub async fn set_failed(&self, reason: impl Into<String>) {
        *self.readiness.write().await = Readiness::Failed(reason.into());
    }
}
