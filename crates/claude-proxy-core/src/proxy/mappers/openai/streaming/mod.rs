mod segmenter;
mod stream_formatters;
mod translator;

pub use segmenter::{segment, Segments, TEXT_CHUNK_MAX_CHARS};
pub use stream_formatters::{chunk_frame, done_line, error_line, sse_line, ChunkKind, DONE_LINE};
pub use translator::{translate_stream, OutboundFrame, StreamTranslator, TranslatorState};
