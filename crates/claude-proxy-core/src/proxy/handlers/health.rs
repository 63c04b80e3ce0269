use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Not behind auth.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
