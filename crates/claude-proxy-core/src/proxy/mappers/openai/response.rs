//! Claude → OpenAI response transformation (non-streaming).

use chrono::Utc;
use claude_proxy_types::protocol::openai::{
    AssistantMessage, ChatCompletionResponse, ChatRole, Choice, Usage, CHAT_COMPLETION_OBJECT,
};
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::proxy::upstream::UpstreamResponse;

/// Fresh `chatcmpl-<uuid>` identifier.
pub fn completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4())
}

pub fn transform_claude_response(
    response: UpstreamResponse,
    model: &str,
    json_mode: bool,
) -> GatewayResult<ChatCompletionResponse> {
    let content = if json_mode { reformat_json(&response.text)? } else { response.text };

    Ok(ChatCompletionResponse {
        id: completion_id(),
        object: CHAT_COMPLETION_OBJECT.to_string(),
        created: Utc::now().timestamp(),
        model: model.to_string(),
        choices: vec![Choice {
            index: 0,
            message: AssistantMessage { role: ChatRole::Assistant, content },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage::new(response.input_tokens, response.output_tokens),
    })
}

/// Re-parse and pretty-print; malformed output is discarded, never passed through.
pub fn reformat_json(text: &str) -> GatewayResult<String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        tracing::error!("[OpenAI-Response] Failed to parse response as JSON: {}", e);
        GatewayError::InvalidJsonOutput
    })?;
    serde_json::to_string_pretty(&value).map_err(|e| GatewayError::Internal(e.to_string()))
}
