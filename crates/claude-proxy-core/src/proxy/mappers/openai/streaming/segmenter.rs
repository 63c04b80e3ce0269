// Chunk segmentation for re-streaming upstream deltas.
//
// `segment` splits an accumulated buffer into chunks that are safe to emit now
// and a remainder that must wait for more input. Joining `ready` followed by
// `remainder` always reproduces the input exactly.

/// Free-text chunks are packed up to this many characters.
pub const TEXT_CHUNK_MAX_CHARS: usize = 100;

const SENTENCE_DELIMITER: &str = ". ";

/// Result of one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Chunks that can be emitted, in order.
    pub ready: Vec<String>,
    /// Trailing text that may still be extended by later deltas.
    pub remainder: String,
}

pub fn segment(buffer: &str, json_mode: bool) -> Segments {
    if json_mode {
        segment_json(buffer)
    } else {
        segment_text(buffer)
    }
}

/// Greedy sentence packing. The delimiter stays attached to the sentence it
/// ends; the last open chunk (which always holds the final fragment) is the
/// remainder. A single sentence longer than the limit is never split.
fn segment_text(buffer: &str) -> Segments {
    let mut ready = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for fragment in buffer.split_inclusive(SENTENCE_DELIMITER) {
        let fragment_chars = fragment.chars().count();
        if !current.is_empty() && current_chars + fragment_chars > TEXT_CHUNK_MAX_CHARS {
            ready.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        current.push_str(fragment);
        current_chars += fragment_chars;
    }

    Segments { ready, remainder: current }
}

/// Emits a chunk each time brace depth returns to zero. String literals
/// (with backslash escapes) are skipped so braces inside values don't count.
/// A `}` at depth zero is treated as plain text.
fn segment_json(buffer: &str) -> Segments {
    let mut ready = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut boundary = 0usize;

    for (idx, ch) in buffer.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => depth += 1,
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let end = idx + ch.len_utf8();
                    ready.push(buffer[boundary..end].to_string());
                    boundary = end;
                }
            },
            _ => {},
        }
    }

    Segments { ready, remainder: buffer[boundary..].to_string() }
}
