//! HTTP surface of the website question-answering backend.
//!
//! The listener comes up immediately; the pipeline is bootstrapped in the
//! background and `/ask` answers `503 INDEX_WARMING_UP` until it is ready.

pub mod core;
pub mod error_handler;
mod middleware_layer;
pub mod routes;

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use rag_answer::{PipelineError, RagPipeline};
use rag_index::{IndicatifProgress, NoopProgress, Progress};
use tokio::signal;
use tracing::{error, info, warn};

use crate::{
    core::app_state::{AppConfig, AppState},
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{ask::ask_question_route::ask_question, health::health_route::health},
};

const RETRY_INITIAL: Duration = Duration::from_secs(2);
const RETRY_MAX: Duration = Duration::from_secs(60);

/// Reads configuration, starts warming the pipeline and serves until Ctrl+C.
///
/// # Errors
/// Invalid configuration, bind failure or a fatal server error.
pub async fn start() -> Result<(), AppError> {
    let cfg = AppConfig::from_env()?;
    let llm = cfg.llm_profiles()?;
    let state = Arc::new(AppState::warming_up(llm));

    tokio::spawn(warm_up(state.clone(), cfg.clone()));

    let listener = tokio::net::TcpListener::bind(cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.address, mode = %cfg.answer.mode, "API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ask", post(ask_question))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Builds the pipeline and flips the readiness gate.
async fn warm_up(state: Arc<AppState>, cfg: AppConfig) {
    let progress: Box<dyn Progress> = if std::io::stderr().is_terminal() {
        Box::new(IndicatifProgress::spinner())
    } else {
        Box::new(NoopProgress)
    };
    let llm = state.llm.clone();

    warm_up_with(&state, RETRY_INITIAL, || {
        RagPipeline::bootstrap(&cfg.index, cfg.answer.clone(), llm.clone(), progress.as_ref())
    })
    .await;
}

/// Runs `attempt` until it succeeds or fails for a reason other than an
/// unreachable model. The state stays `WarmingUp` between retries.
async fn warm_up_with<F, Fut>(state: &AppState, initial_backoff: Duration, mut attempt: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RagPipeline, PipelineError>>,
{
    let mut backoff = initial_backoff;
    let mut tries: u32 = 1;
    loop {
        match attempt().await {
            Ok(pipeline) => {
                info!(
                    tries,
                    entries = pipeline.index_entries(),
                    source = ?pipeline.report().map(|r| r.source),
                    "pipeline ready"
                );
                state.set_ready(Arc::new(pipeline)).await;
                return;
            }
            Err(PipelineError::ModelUnavailable(reason)) => {
                warn!(
                    tries,
                    retry_in_ms = backoff.as_millis() as u64,
                    error = %reason,
                    "embedding model unreachable; retrying bootstrap"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(RETRY_MAX);
                tries += 1;
            }
            Err(err) => {
                error!(tries, error = %err, "pipeline bootstrap failed; /ask will answer 503");
                state.set_failed(err.to_string()).await;
                return;
            }
        }
    }
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "cannot listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rag_answer::{AnswerConfig, AnswerMode};
    use rag_index::{EmbedderKind, IndexConfig};

    use super::*;
    use crate::core::app_state::Readiness;
    use crate::routes::test_support::extractive_rag;

    #[tokio::test]
    async fn keeps_warming_up_while_the_embedder_is_down() {
        let state = AppState::warming_up(None);
        let calls = AtomicUsize::new(0);

        warm_up_with(&state, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(PipelineError::ModelUnavailable("connection refused".into()))
                } else {
                    Ok(extractive_rag().await)
                }
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(state.readiness().await, Readiness::Ready(_)));
    }

    #[tokio::test]
    async fn config_errors_are_not_retried() {
        let state = AppState::warming_up(None);
        let calls = AtomicUsize::new(0);

        warm_up_with(&state, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(PipelineError::Config("ANSWER_MODE=retrieval needs a chat model".into())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match state.readiness().await {
            Readiness::Failed(reason) => assert!(reason.contains("needs a chat model")),
            _ => panic!("expected Failed"),
        }
    }

    #[tokio::test]
    async fn warm_up_runs_as_a_background_task() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("site.txt");
        std::fs::write(&corpus_path, "Plan A costs $10/mo. Plan B costs $20/mo.").unwrap();

        let cfg = AppConfig {
            address: "127.0.0.1:0".parse().unwrap(),
            index: IndexConfig {
                corpus_path,
                index_path: dir.path().join("index.json"),
                embedder: EmbedderKind::Hashing,
                ..IndexConfig::default()
            },
            answer: AnswerConfig {
                mode: AnswerMode::Extractive,
                ..AnswerConfig::default()
            },
        };
        let state = Arc::new(AppState::warming_up(None));

        let handle = tokio::spawn(warm_up(state.clone(), cfg));
        handle.await.unwrap();

        assert!(matches!(state.readiness().await, Readiness::Ready(_)));
    }
}
