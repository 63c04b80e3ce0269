// OpenAI SSE stream formatting helpers
use claude_proxy_types::protocol::openai::{
    ChatCompletionChunk, ChatRole, ChunkChoice, ChunkDelta, CHAT_COMPLETION_CHUNK_OBJECT,
};
use serde::Serialize;
use serde_json::json;

/// Terminal sentinel frame.
pub const DONE_LINE: &str = "data: [DONE]\n\n";

/// Format an SSE data line
#[inline]
pub fn sse_line<T: Serialize>(data: &T) -> String {
    format!("data: {}\n\n", serde_json::to_string(data).unwrap_or_default())
}

#[inline]
pub fn done_line() -> &'static str {
    DONE_LINE
}

/// In-band error frame. Deliberately not chunk-shaped: `{"error": "<message>"}`.
pub fn error_line(message: &str) -> String {
    sse_line(&json!({ "error": message }))
}

/// Which of the three chunk kinds to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind<'a> {
    Start,
    Delta(&'a str),
    Stop,
}

/// Build a `chat.completion.chunk` for the given kind.
pub fn chunk_frame(stream_id: &str, created_ts: i64, model: &str, kind: ChunkKind<'_>) -> ChatCompletionChunk {
    let (delta, finish_reason) = match kind {
        ChunkKind::Start => (ChunkDelta { role: Some(ChatRole::Assistant), content: None }, None),
        ChunkKind::Delta(content) => {
            (ChunkDelta { role: None, content: Some(content.to_string()) }, None)
        },
        ChunkKind::Stop => (ChunkDelta::default(), Some("stop".to_string())),
    };

    ChatCompletionChunk {
        id: stream_id.to_string(),
        object: CHAT_COMPLETION_CHUNK_OBJECT.to_string(),
        created: created_ts,
        model: model.to_string(),
        choices: vec![ChunkChoice { index: 0, delta, finish_reason }],
    }
}
