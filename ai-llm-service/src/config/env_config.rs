//! Model configs loaded from environment variables.
//!
//! Two roles are supported:
//!
//! - **Chat**      → answer synthesis (low temperature, grounded output)
//! - **Embedding** → retrieval vectors (deterministic)
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider for the chat role (`ollama` | `openai`, default `ollama`)
//! - `EMBEDDING_KIND`   = provider for the embedding role (defaults to `LLM_KIND`)
//! - `LLM_MAX_TOKENS`   = optional completion budget (u32)
//! - `LLM_TEMPERATURE`  = optional chat temperature (default 0.1)
//! - `LLM_TIMEOUT_SECS` = optional chat request timeout (default 120)
//! - `EMBEDDING_MODEL`  = embedding model (mandatory for the embedding role)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = chat model (mandatory)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` = bearer token (mandatory)
//! - `OPENAI_URL`     = endpoint (default `https://api.openai.com`)
//! - `OPENAI_MODEL`   = chat model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, Result, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, must_env,
    },
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Resolves an Ollama endpoint from an explicit URL or a local port.
///
/// Precedence: `url` if non-empty, then `http://localhost:{port}`.
///
/// # Errors
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if the port is not a valid `u16`
pub fn resolve_ollama_endpoint(url: Option<String>, port: Option<String>) -> Result<String> {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        return Ok(url.trim().to_string());
    }
    if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

fn provider_from_env(var: &'static str, fallback: LlmProvider) -> Result<LlmProvider> {
    match env_opt(var) {
        Some(kind) => Ok(kind.parse::<LlmProvider>()?),
        None => Ok(fallback),
    }
}

/// Builds the **chat** profile used to synthesise answers.
///
/// # Defaults
/// - `temperature = 0.1`
/// - `timeout_secs = 120`
pub fn chat_config_from_env() -> Result<LlmModelConfig> {
    let provider = provider_from_env("LLM_KIND", LlmProvider::Ollama)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.or(Some(0.1));
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(120));

    let cfg = match provider {
        LlmProvider::Ollama => LlmModelConfig {
            provider,
            model: must_env("OLLAMA_MODEL")?,
            endpoint: resolve_ollama_endpoint(env_opt("OLLAMA_URL"), env_opt("OLLAMA_PORT"))?,
            api_key: None,
            max_tokens,
            temperature,
            top_p: None,
            timeout_secs,
        },
        LlmProvider::OpenAI => LlmModelConfig {
            provider,
            model: must_env("OPENAI_MODEL")?,
            endpoint: env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens,
            temperature,
            top_p: None,
            timeout_secs,
        },
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the **embedding** profile used for corpus and query vectors.
///
/// # Defaults
/// - `temperature = 0.0` (deterministic)
/// - `timeout_secs = 30`
pub fn embedding_config_from_env() -> Result<LlmModelConfig> {
    let chat_kind = provider_from_env("LLM_KIND", LlmProvider::Ollama)?;
    let provider = provider_from_env("EMBEDDING_KIND", chat_kind)?;
    let model = must_env("EMBEDDING_MODEL")?;

    let cfg = match provider {
        LlmProvider::Ollama => LlmModelConfig {
            provider,
            model,
            endpoint: resolve_ollama_endpoint(env_opt("OLLAMA_URL"), env_opt("OLLAMA_PORT"))?,
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(30),
        },
        LlmProvider::OpenAI => LlmModelConfig {
            provider,
            model,
            endpoint: env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(30),
        },
    };
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_over_port() {
        let ep = resolve_ollama_endpoint(
            Some("http://gpu-box:11434".into()),
            Some("9999".into()),
        )
        .unwrap();
        assert_eq!(ep, "http://gpu-box:11434");
    }

    #[test]
    fn port_falls_back_to_localhost() {
        let ep = resolve_ollama_endpoint(Some("  ".into()), Some("11434".into())).unwrap();
        assert_eq!(ep, "http://localhost:11434");
    }

    #[test]
    fn invalid_port_and_missing_both() {
        assert!(matches!(
            resolve_ollama_endpoint(None, Some("99999".into())),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "OLLAMA_PORT", .. }))
        ));
        assert!(matches!(
            resolve_ollama_endpoint(None, None),
            Err(AiLlmError::Config(ConfigError::MissingVar(_)))
        ));
    }
}
