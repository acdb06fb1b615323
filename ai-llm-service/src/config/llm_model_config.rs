use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{Result, validate_http_endpoint, validate_range_f32};

/// Configuration for one model profile (chat or embedding).
///
/// # Fields
///
/// - `provider`: backend serving the model.
/// - `model`: model identifier (e.g. `"llama3.1:8b"`, `"gpt-4o-mini"`, `"all-minilm"`).
/// - `endpoint`: base URL of the backend, without the API path.
/// - `api_key`: bearer token for providers that require one.
/// - `max_tokens`: completion budget (ignored by embedding calls).
/// - `temperature`: sampling temperature; low values keep answers grounded.
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: per-request HTTP timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "llama3.1:8b".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     api_key: None,
///     max_tokens: Some(512),
///     temperature: Some(0.1),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks the invariants every client relies on.
    ///
    /// # Errors
    /// Returns a [`crate::error_handler::ConfigError`] wrapped in
    /// [`crate::AiLlmError`] for an empty model, a non-HTTP endpoint or
    /// out-of-range sampling parameters.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(crate::error_handler::ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", self.endpoint.trim())?;
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        Ok(())
    }

    /// Endpoint without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AiLlmError;
    use crate::error_handler::ConfigError;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "m".into(),
            endpoint: "http://localhost:11434/".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.2),
            top_p: Some(0.9),
            timeout_secs: None,
        }
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(cfg().base_url(), "http://localhost:11434");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut c = cfg();
        c.model = "  ".into();
        assert!(matches!(
            c.validate(),
            Err(AiLlmError::Config(ConfigError::EmptyModel))
        ));

        let mut c = cfg();
        c.endpoint = "localhost:11434".into();
        assert!(matches!(
            c.validate(),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { .. }))
        ));

        let mut c = cfg();
        c.top_p = Some(1.5);
        assert!(matches!(
            c.validate(),
            Err(AiLlmError::Config(ConfigError::OutOfRange { field: "top_p", .. }))
        ));
    }
}
