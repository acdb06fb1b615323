//! Health probes for model backends.
//!
//! - Ollama: `GET {endpoint}/api/tags`, model looked up among installed tags
//! - OpenAI: `GET {endpoint}/v1/models` with bearer auth
//!
//! [`HealthService::check`] never fails; errors become `ok = false`.
//! The strict probes are used at startup where an unreachable embedding
//! backend must abort index construction.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, Result, make_snippet};

/// JSON-serializable snapshot for one profile, rendered by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.base_url().to_string(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Reusable checker with a shared HTTP client.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// # Errors
    /// [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let default_timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder()
            .timeout(default_timeout)
            .build()?;
        Ok(Self {
            client,
            default_timeout,
        })
    }

    /// Resilient probe: any failure is folded into the returned status.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let started = Instant::now();
        match self.probe(cfg).await {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status =
                    HealthStatus::new(cfg, false, started.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    model = %status.model,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Runs [`Self::check`] for every config in order.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// Strict probe. Transport failures and non-2xx statuses are errors;
    /// a reachable backend without the model yields `ok = false`.
    pub async fn probe(&self, cfg: &LlmModelConfig) -> Result<HealthStatus> {
        match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(cfg).await,
            LlmProvider::OpenAI => self.probe_openai(cfg).await,
        }
    }

    async fn probe_ollama(&self, cfg: &LlmModelConfig) -> Result<HealthStatus> {
        let url = format!("{}/api/tags", cfg.base_url());
        let started = Instant::now();
        debug!(model = %cfg.model, "GET {url}");

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .send()
            .await?;
        let latency = started.elapsed().as_millis();
        let resp = ensure_success(resp, url).await?;

        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        let status = match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) => {
                let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
                if ollama_has_model(&names, &cfg.model) {
                    HealthStatus::new(cfg, true, latency, "Ollama is healthy; model is available")
                } else {
                    HealthStatus::new(
                        cfg,
                        false,
                        latency,
                        "Ollama is up, but model not found in /api/tags",
                    )
                }
            }
            Ok(Tags { models: None }) => {
                HealthStatus::new(cfg, true, latency, "Ollama is reachable")
            }
            Err(e) => HealthStatus::new(
                cfg,
                true,
                latency,
                format!("Ollama is reachable; failed to decode /api/tags: {e}"),
            ),
        };
        Ok(status)
    }

    async fn probe_openai(&self, cfg: &LlmModelConfig) -> Result<HealthStatus> {
        let url = format!("{}/v1/models", cfg.base_url());
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Decode("missing OpenAI API key".into()))?;
        let auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HealthError::Decode(format!("invalid API key header: {e}")))?;

        let started = Instant::now();
        debug!(model = %cfg.model, "GET {url}");
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await?;
        let latency = started.elapsed().as_millis();
        let resp = ensure_success(resp, url).await?;

        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        let status = match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => {
                HealthStatus::new(cfg, true, latency, "OpenAI is healthy; model is available")
            }
            Ok(_) => HealthStatus::new(
                cfg,
                false,
                latency,
                "OpenAI is up, but model not found in /v1/models",
            ),
            Err(e) => HealthStatus::new(
                cfg,
                true,
                latency,
                format!("OpenAI is reachable; failed to decode /v1/models: {e}"),
            ),
        };
        Ok(status)
    }

    fn timeout_for(&self, cfg: &LlmModelConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .map(|t| t.min(self.default_timeout))
            .unwrap_or(self.default_timeout)
    }
}

async fn ensure_success(resp: reqwest::Response, url: String) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    Err(AiLlmError::from(HealthError::HttpStatus(HttpError {
        status,
        url,
        snippet,
    })))
}

/// Ollama lists tags with an explicit suffix (`all-minilm:latest`) while users
/// usually configure the bare name.
fn ollama_has_model(installed: &[&str], wanted: &str) -> bool {
    installed.iter().any(|name| {
        *name == wanted
            || (!wanted.contains(':') && name.strip_suffix(":latest") == Some(wanted))
    })
}
