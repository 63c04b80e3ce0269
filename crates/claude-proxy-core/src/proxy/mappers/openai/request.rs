//! OpenAI → Claude request transformation.

use claude_proxy_types::protocol::claude::{ClaudeMessage, ClaudeRole, MessagesRequest};
use claude_proxy_types::protocol::openai::{ChatCompletionRequest, ChatMessage, ChatRole};
use claude_proxy_types::ProxyConfig;

/// Appended to the system instruction when the caller requests `json_object` output.
pub const JSON_MODE_INSTRUCTION: &str = "Respond with a single, valid JSON object and nothing \
else. Do not add any explanation or prose before or after it, and do not wrap it in markdown \
code fences. The output must be parseable as JSON exactly as written.";

/// Upstream call parameters plus the flags the response path needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRequest {
    pub params: MessagesRequest,
    /// Drives JSON-aware chunking and non-streaming re-validation.
    pub json_mode: bool,
}

pub fn transform_openai_request(
    request: &ChatCompletionRequest,
    config: &ProxyConfig,
) -> MappedRequest {
    let (system, messages) = split_system_messages(&request.messages);
    let json_mode = request.wants_json_object();

    let system = if json_mode {
        Some(match system {
            Some(existing) => format!("{}\n\n{}", existing, JSON_MODE_INSTRUCTION),
            None => JSON_MODE_INSTRUCTION.to_string(),
        })
    } else {
        system
    };

    let params = MessagesRequest {
        model: config.model.clone(),
        max_tokens: request.max_tokens.unwrap_or(config.default_max_tokens),
        messages,
        system,
        temperature: request.temperature.or(config.default_temperature),
    };

    tracing::debug!(
        "[OpenAI-Request] Mapped {} message(s) → {} upstream message(s), system={}, json_mode={}, max_tokens={}, temperature={:?}",
        request.messages.len(),
        params.messages.len(),
        params.system.is_some(),
        json_mode,
        params.max_tokens,
        params.temperature
    );

    MappedRequest { params, json_mode }
}

/// First system message becomes the instruction; later ones are dropped.
pub fn split_system_messages(messages: &[ChatMessage]) -> (Option<String>, Vec<ClaudeMessage>) {
    let mut system: Option<String> = None;
    let mut conversation = Vec::with_capacity(messages.len());

    for msg in messages {
        let role = match msg.role {
            ChatRole::System => {
                if system.is_none() {
                    system = Some(msg.content.clone());
                } else {
                    tracing::debug!("[OpenAI-Request] Dropping additional system message");
                }
                continue;
            },
            ChatRole::User => ClaudeRole::User,
            ChatRole::Assistant => ClaudeRole::Assistant,
        };
        conversation.push(ClaudeMessage { role, content: msg.content.clone() });
    }

    (system, conversation)
}
