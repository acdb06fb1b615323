//! POST /ask — answers one visitor question from the website corpus.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// Fallback answers (empty question, nothing relevant, model down) are still
/// `200` with `outcome.kind = "rejected"`. Only a pipeline that is not ready
/// yields `503`.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"How much is Plan B?"}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let pipeline = state.pipeline().await?;

    let answer = pipeline.answer_query(&body.question).await;
    debug!(outcome = ?answer.outcome, context = answer.context.len(), "ask: done");

    Ok(ApiResponse::ok(AskResponse::from(answer)).into_response_with_status(StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AppError;
    use crate::routes::test_support::{body_json, extractive_pipeline};

    fn ask(q: &str) -> Result<Json<AskRequest>, JsonRejection> {
        Ok(Json(AskRequest {
            question: q.to_string(),
        }))
    }

    #[tokio::test]
    async fn warming_up_rejects_with_503_code() {
        let state = Arc::new(AppState::warming_up(None));
        let err = ask_question(State(state), ask("How much is Plan B?"))
            .await
            .err();
        assert!(matches!(err, Some(AppError::WarmingUp)));
    }

    #[tokio::test]
    async fn failed_startup_is_reported() {
        let state = Arc::new(AppState::warming_up(None));
        state.set_failed("corpus missing").await;
        let err = ask_question(State(state), ask("hi")).await.err();
        assert!(matches!(err, Some(AppError::IndexUnavailable(ref m)) if m == "corpus missing"));
    }

    #[tokio::test]
    async fn ready_pipeline_answers_in_envelope() {
        let state = Arc::new(AppState::ready(extractive_pipeline().await, None));
        let resp = ask_question(State(state), ask("How much is Plan B?"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["outcome"]["kind"], "extracted");
        assert!(json["data"]["answer"].as_str().unwrap().contains("$20"));
        assert_eq!(json["data"]["context"][0]["source_offset"], 15);
    }

    #[tokio::test]
    async fn blank_question_is_a_rejected_answer_not_an_error() {
        let state = Arc::new(AppState::ready(extractive_pipeline().await, None));
        let resp = ask_question(State(state), ask("   ")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["data"]["outcome"]["kind"], "rejected");
        assert_eq!(json["data"]["outcome"]["reason"], "empty_query");
    }
}
