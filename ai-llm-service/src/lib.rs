//! Provider-agnostic access to language models.
//!
//! The crate exposes two logical profiles used by the question-answering
//! backend:
//! - **chat**      → completions for answer synthesis
//! - **embedding** → vectors for retrieval
//!
//! Both are described by [`LlmModelConfig`] and served by
//! [`LlmServiceProfiles`], which hides whether Ollama or OpenAI sits behind
//! a profile. Swapping providers is a configuration change only.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, Result};
pub use health_service::{HealthService, HealthStatus};
pub use service_profiles::LlmServiceProfiles;
