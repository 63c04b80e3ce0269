// Claude SSE events → OpenAI chat.completion.chunk stream
use std::convert::Infallible;

use bytes::Bytes;
use chrono::Utc;
use claude_proxy_types::protocol::claude::StreamEvent;
use futures::{Stream, StreamExt};

use super::segmenter::segment;
use super::stream_formatters::{chunk_frame, done_line, error_line, sse_line, ChunkKind};
use crate::proxy::mappers::openai::response::completion_id;
use crate::proxy::upstream::UpstreamError;

/// One outbound event, before SSE rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Start,
    Delta(String),
    Stop,
    /// In-band failure; not chunk-shaped.
    Error(String),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorState {
    Started,
    Streaming,
    Flushing,
    Stopped,
}

/// Per-request state for re-segmenting upstream text deltas.
///
/// Every frame of one stream shares the id and timestamp generated here.
/// After `Stopped` every method returns no frames.
#[derive(Debug)]
pub struct StreamTranslator {
    stream_id: String,
    created_ts: i64,
    model: String,
    json_mode: bool,
    buffer: String,
    state: TranslatorState,
    opened: bool,
}

impl StreamTranslator {
    pub fn new(model: impl Into<String>, json_mode: bool) -> Self {
        Self {
            stream_id: completion_id(),
            created_ts: Utc::now().timestamp(),
            model: model.into(),
            json_mode,
            buffer: String::new(),
            state: TranslatorState::Started,
            opened: false,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn created(&self) -> i64 {
        self.created_ts
    }

    pub fn state(&self) -> TranslatorState {
        self.state
    }

    /// The opening `role: assistant` frame. Only ever emitted once.
    pub fn start(&mut self) -> Vec<OutboundFrame> {
        if self.opened || self.state == TranslatorState::Stopped {
            return Vec::new();
        }
        self.opened = true;
        vec![OutboundFrame::Start]
    }

    pub fn on_event(&mut self, event: StreamEvent) -> Vec<OutboundFrame> {
        if self.state == TranslatorState::Stopped {
            return Vec::new();
        }

        match event {
            StreamEvent::Error { error } => {
                let err = UpstreamError::Api { kind: error.error_type, message: error.message };
                tracing::warn!("[OpenAI-Stream] Upstream error event ({}): {}", err.category(), err);
                self.fail(&err.to_string())
            },
            event => match event.text_delta() {
                Some(text) => {
                    let mut frames = self.start();
                    frames.extend(self.push_text(text));
                    frames
                },
                None => {
                    tracing::trace!("[OpenAI-Stream] Ignoring upstream event: {:?}", event);
                    Vec::new()
                },
            },
        }
    }

    fn push_text(&mut self, text: &str) -> Vec<OutboundFrame> {
        self.state = TranslatorState::Streaming;
        self.buffer.push_str(text);

        let segments = segment(&self.buffer, self.json_mode);
        self.buffer = segments.remainder;
        segments.ready.into_iter().map(OutboundFrame::Delta).collect()
    }

    /// Clean end of the upstream sequence: flush, `Stop`, `Done`.
    pub fn finish(&mut self) -> Vec<OutboundFrame> {
        if self.state == TranslatorState::Stopped {
            return Vec::new();
        }

        let mut frames = self.start();
        self.state = TranslatorState::Flushing;
        if !self.buffer.is_empty() {
            frames.push(OutboundFrame::Delta(std::mem::take(&mut self.buffer)));
        }
        frames.push(OutboundFrame::Stop);
        frames.push(OutboundFrame::Done);
        self.state = TranslatorState::Stopped;
        frames
    }

    /// Upstream failure: error frame then `Done`. The pending remainder and
    /// the `Stop` frame are dropped.
    pub fn fail(&mut self, message: &str) -> Vec<OutboundFrame> {
        if self.state == TranslatorState::Stopped {
            return Vec::new();
        }

        self.buffer.clear();
        self.state = TranslatorState::Stopped;
        vec![OutboundFrame::Error(message.to_string()), OutboundFrame::Done]
    }

    /// Render a frame as one SSE `data:` line.
    pub fn render(&self, frame: &OutboundFrame) -> String {
        let kind = match frame {
            OutboundFrame::Start => ChunkKind::Start,
            OutboundFrame::Delta(content) => ChunkKind::Delta(content),
            OutboundFrame::Stop => ChunkKind::Stop,
            OutboundFrame::Error(message) => return error_line(message),
            OutboundFrame::Done => return done_line().to_string(),
        };
        sse_line(&chunk_frame(&self.stream_id, self.created_ts, &self.model, kind))
    }
}

/// Drive an upstream event stream through the translator, yielding SSE bytes.
///
/// Polled lazily by the response body; dropping it drops `upstream`.
pub fn translate_stream<S>(
    upstream: S,
    mut translator: StreamTranslator,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    S: Stream<Item = Result<StreamEvent, UpstreamError>> + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);

        for frame in translator.start() {
            yield Ok(Bytes::from(translator.render(&frame)));
        }

        while let Some(item) = upstream.next().await {
            let frames = match item {
                Ok(event) => translator.on_event(event),
                Err(e) => {
                    tracing::error!(
                        "[OpenAI-Stream] Upstream stream failed ({}): {}",
                        e.category(),
                        e
                    );
                    translator.fail(&e.to_string())
                },
            };
            for frame in frames {
                yield Ok(Bytes::from(translator.render(&frame)));
            }
            if translator.state() == TranslatorState::Stopped {
                break;
            }
        }

        for frame in translator.finish() {
            yield Ok(Bytes::from(translator.render(&frame)));
        }

        tracing::debug!("[OpenAI-Stream] Stream {} closed", translator.stream_id());
    }
}
