// OpenAI mapper module
// Handles OpenAI ↔ Claude protocol conversion

pub mod request;
pub mod response;
pub mod streaming;

pub use request::*;
pub use response::*;
