//! Rewrites axum's plain-text JSON rejections into the [`ApiResponse`] envelope.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

const REQUEST_ID: &str = "X-Request-Id";
const MAX_REJECTION_BYTES: usize = 64 * 1024;

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_REJECTION_BYTES)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn hint_for(msg: &str) -> Option<String> {
    if msg.contains("missing field `question`") {
        Some("Send a JSON object like {\"question\": \"How much is Plan B?\"}.".into())
    } else if msg.contains("invalid type") {
        Some("`question` must be a string.".into())
    } else if msg.contains("Content-Type") {
        Some("Set the header `Content-Type: application/json`.".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) {
    let present = parts
        .headers
        .get(REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());
    if present {
        return;
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    if let Ok(v) = HeaderValue::from_str(&format!("req-{nanos}")) {
        parts.headers.insert(REQUEST_ID, v);
    }
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    let rejected = matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    if !rejected {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    ensure_request_id(&mut parts);
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    let code = match status {
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => "BAD_REQUEST",
    };
    let envelope = ApiResponse::<()>::fail(code, original.trim()).with_detail(ApiErrorDetail {
        path: original.contains("question").then(|| "question".to_string()),
        hint: hint_for(&original),
    });

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_for_common_mistakes() {
        assert!(hint_for("Failed to deserialize the JSON body into the target type: missing field `question` at line 1 column 2").is_some());
        assert!(hint_for("Expected request with `Content-Type: application/json`").is_some());
        assert!(hint_for("something else").is_none());
    }
}
