// OpenAI chat completions handler
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use claude_proxy_types::protocol::openai::ChatCompletionRequest;
use tracing::{debug, info};

use crate::error::{GatewayError, GatewayResult};
use crate::proxy::mappers::openai::streaming::{translate_stream, StreamTranslator};
use crate::proxy::mappers::openai::{transform_claude_response, transform_openai_request, MappedRequest};
use crate::proxy::server::AppState;

pub async fn handle_chat_completions(
    State(state): State<AppState>,
    body: Bytes,
) -> GatewayResult<Response> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid JSON: {}", e)))?;

    if request.messages.is_empty() {
        return Err(GatewayError::InvalidRequest("At least one message is required".to_string()));
    }

    info!(
        "[OpenAI] Chat completion: {} message(s), stream={}, json_mode={}",
        request.messages.len(),
        request.stream,
        request.wants_json_object()
    );

    let mapped = transform_openai_request(&request, &state.config);

    if request.stream {
        stream_completion(&state, mapped).await
    } else {
        complete(&state, mapped).await
    }
}

async fn complete(state: &AppState, mapped: MappedRequest) -> GatewayResult<Response> {
    let upstream = state.upstream.create_message(&mapped.params).await?;
    debug!(
        "[OpenAI] Upstream returned {} chars, usage={}/{}",
        upstream.text.len(),
        upstream.input_tokens,
        upstream.output_tokens
    );

    let response = transform_claude_response(upstream, &mapped.params.model, mapped.json_mode)?;
    Ok(Json(response).into_response())
}

/// The upstream stream is opened before anything is sent. Failures from then
/// on are reported in-band.
async fn stream_completion(state: &AppState, mapped: MappedRequest) -> GatewayResult<Response> {
    let events = state.upstream.stream_message(&mapped.params).await?;
    let translator = StreamTranslator::new(mapped.params.model, mapped.json_mode);
    debug!("[OpenAI] Streaming as {}", translator.stream_id());

    let body = Body::from_stream(translate_stream(events, translator));
    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}
