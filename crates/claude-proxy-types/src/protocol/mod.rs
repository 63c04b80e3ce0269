//! Protocol definitions for both sides of the gateway:
//! - OpenAI (ChatCompletions API), spoken to callers
//! - Anthropic (Claude Messages API), spoken to the upstream

pub mod claude;
pub mod openai;

pub use claude::ClaudeRole;
pub use openai::ChatRole;
