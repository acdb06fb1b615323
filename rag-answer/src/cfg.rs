//! Runtime configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rag_index::DistanceMetric;

use crate::error::PipelineError;
use crate::prompt::DEFAULT_PERSONA;

/// Cosine-distance cutoff used when `RAG_MAX_DISTANCE` is unset.
pub const DEFAULT_COSINE_MAX_DISTANCE: f32 = 0.85;

/// How questions are answered, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    /// Retrieve top-k passages, generate from them only.
    Retrieval,
    /// Inject the whole corpus as context, no retrieval.
    FullCorpus,
    /// Return the best passage verbatim, no language model.
    Extractive,
}

impl FromStr for AnswerMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "retrieval" | "rag" => Ok(AnswerMode::Retrieval),
            "full_corpus" | "full" => Ok(AnswerMode::FullCorpus),
            "extractive" => Ok(AnswerMode::Extractive),
            other => Err(PipelineError::Config(format!("unknown ANSWER_MODE: {other}"))),
        }
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerMode::Retrieval => f.write_str("retrieval"),
            AnswerMode::FullCorpus => f.write_str("full_corpus"),
            AnswerMode::Extractive => f.write_str("extractive"),
        }
    }
}

/// Config bag for the answering side. All fields have defaults.
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    pub mode: AnswerMode,
    pub top_k: usize,
    /// Hits farther than this are not used as context.
    pub max_distance: f32,
    pub max_ctx_chars: usize,
    pub persona: String,
    pub intents_path: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            mode: AnswerMode::Retrieval,
            top_k: 4,
            max_distance: DEFAULT_COSINE_MAX_DISTANCE,
            max_ctx_chars: 8000,
            persona: DEFAULT_PERSONA.to_string(),
            intents_path: None,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl AnswerConfig {
    /// Build from environment variables with defaults. The distance cutoff
    /// is only defaulted for `metric = cosine`; L2 distances have no
    /// model-independent scale, so euclid needs `RAG_MAX_DISTANCE`.
    ///
    /// # Errors
    /// [`PipelineError::Config`] for an unknown mode, out-of-range values or
    /// a missing cutoff under euclid.
    pub fn from_env_for(metric: DistanceMetric) -> Result<Self, PipelineError> {
        let d = Self::default();
        let cfg = Self {
            mode: match env_opt("ANSWER_MODE") {
                Some(m) => m.parse()?,
                None => d.mode,
            },
            top_k: parse("RAG_TOP_K", d.top_k),
            max_distance: max_distance_for(metric, env_opt("RAG_MAX_DISTANCE"))?,
            max_ctx_chars: parse("MAX_CTX_CHARS", d.max_ctx_chars),
            persona: env_opt("ASSISTANT_PERSONA").unwrap_or(d.persona),
            intents_path: env_opt("INTENTS_PATH").map(PathBuf::from),
            request_timeout: Duration::from_secs(parse(
                "REQUEST_TIMEOUT_SECS",
                d.request_timeout.as_secs(),
            )),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.top_k == 0 {
            return Err(PipelineError::Config("RAG_TOP_K must be >= 1".into()));
        }
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(PipelineError::Config(
                "RAG_MAX_DISTANCE must be a non-negative number".into(),
            ));
        }
        if self.max_ctx_chars == 0 {
            return Err(PipelineError::Config("MAX_CTX_CHARS must be > 0".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(PipelineError::Config("REQUEST_TIMEOUT_SECS must be > 0".into()));
        }
        Ok(())
    }
}

fn max_distance_for(metric: DistanceMetric, raw: Option<String>) -> Result<f32, PipelineError> {
    match (raw, metric) {
        (Some(v), _) => v.parse().map_err(|_| {
            PipelineError::Config(format!("RAG_MAX_DISTANCE is not a number: {v}"))
        }),
        (None, DistanceMetric::Cosine) => Ok(DEFAULT_COSINE_MAX_DISTANCE),
        (None, DistanceMetric::Euclid) => Err(PipelineError::Config(
            "INDEX_METRIC=euclid needs an explicit RAG_MAX_DISTANCE".into(),
        )),
    }
}

fn env_opt(k: &str) -> Option<String> {
    std::env::var(k)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(k: &str, dflt: T) -> T {
    env_opt(k).and_then(|v| v.parse().ok()).unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes() {
        assert_eq!("full-corpus".parse::<AnswerMode>().unwrap(), AnswerMode::FullCorpus);
        assert_eq!("RAG".parse::<AnswerMode>().unwrap(), AnswerMode::Retrieval);
        assert_eq!("extractive".parse::<AnswerMode>().unwrap(), AnswerMode::Extractive);
        assert!("chat".parse::<AnswerMode>().is_err());
    }

    #[test]
    fn validation() {
        assert!(AnswerConfig::default().validate().is_ok());

        let cfg = AnswerConfig {
            top_k: 0,
            ..AnswerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PipelineError::Config(_))));

        let cfg = AnswerConfig {
            max_distance: f32::NAN,
            ..AnswerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn distance_cutoff_follows_the_metric() {
        assert_eq!(
            max_distance_for(DistanceMetric::Cosine, None).unwrap(),
            DEFAULT_COSINE_MAX_DISTANCE
        );
        assert!(matches!(
            max_distance_for(DistanceMetric::Euclid, None),
            Err(PipelineError::Config(_))
        ));
        assert_eq!(
            max_distance_for(DistanceMetric::Euclid, Some("12.5".into())).unwrap(),
            12.5
        );
        assert!(max_distance_for(DistanceMetric::Cosine, Some("near".into())).is_err());
    }
}
