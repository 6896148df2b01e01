use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use bytes::Bytes;
use serde_json::{json, Value};
use smarttask_core::GenerationError;
use tracing::error;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/generate-subtasks", post(generate_subtasks))
}

/// The body is taken raw so that malformed JSON, a wrong content type or a
/// non-object body all end up as a missing title rather than an extractor
/// rejection.
async fn generate_subtasks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .generator
        .generate_from_payload(&payload)
        .await
        .map(|resp| Json(json!({ "subtasks": resp.subtasks() })))
        .map_err(to_error)
}

/// Map a generation failure to its HTTP status and body.
///
/// Provider failures are reported with a fixed message; their detail only
/// goes to the log.
pub fn to_error(e: GenerationError) -> (StatusCode, Json<Value>) {
    match e {
        GenerationError::MissingTitle => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Task title is required" })),
        ),
        GenerationError::ProviderUnavailable => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Subtask generation is not configured" })),
        ),
        GenerationError::SchemaViolation(v) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "Subtasks format invalid",
                "details": v.violations,
            })),
        ),
        GenerationError::ProviderFailure(detail) => {
            error!("subtask generation failed: {detail}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate subtasks" })),
            )
        }
    }
}
