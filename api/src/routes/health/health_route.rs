//! GET /health — readiness of the index plus model backend health.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};

use crate::{
    core::{
        app_state::{AppState, Readiness},
        http::response_envelope::ApiResponse,
    },
    routes::health::health_response::{HealthResponse, ServiceStatus},
};

/// `200` once the pipeline is ready, `503` while warming up or after a failed start.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let llm = match &state.llm {
        Some(profiles) => profiles.health_all().await,
        None => Vec::new(),
    };

    let body = match state.readiness().await {
        Readiness::Ready(p) => HealthResponse {
            status: ServiceStatus::Ready,
            mode: Some(p.mode().to_string()),
            index_entries: p.index_entries(),
            index: p.report().cloned(),
            message: None,
            llm,
        },
        Readiness::WarmingUp => HealthResponse {
            status: ServiceStatus::WarmingUp,
            mode: None,
            index_entries: 0,
            index: None,
            message: Some("index is being prepared".into()),
            llm,
        },
        Readiness::Failed(reason) => HealthResponse {
            status: ServiceStatus::Failed,
            mode: None,
            index_entries: 0,
            index: None,
            message: Some(reason),
            llm,
        },
    };

    let status = match body.status {
        ServiceStatus::Ready => StatusCode::OK,
        ServiceStatus::WarmingUp | ServiceStatus::Failed => StatusCode::SERVICE_UNAVAILABLE,
    };
    ApiResponse::ok(body).into_response_with_status(status)
}
