use ai_llm_service::HealthStatus;
use rag_index::BootstrapReport;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    WarmingUp,
    Ready,
    Failed,
}

/// Response payload for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub index_entries: usize,
    /// How the index was obtained at startup (loaded, built, rebuilt).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<BootstrapReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// One entry per distinct model profile.
    pub llm: Vec<HealthStatus>,
}
