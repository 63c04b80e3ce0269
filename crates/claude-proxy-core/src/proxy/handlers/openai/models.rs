// OpenAI models listing
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use claude_proxy_types::protocol::openai::{ModelCard, ModelList};

use crate::proxy::server::AppState;

/// The configured upstream model is the only one served.
pub async fn handle_list_models(State(state): State<AppState>) -> impl IntoResponse {
    Json(ModelList {
        data: vec![ModelCard {
            id: state.config.model.clone(),
            object: "model".to_string(),
            created: Utc::now().timestamp(),
            owned_by: "anthropic".to_string(),
        }],
        object: "list".to_string(),
    })
}
