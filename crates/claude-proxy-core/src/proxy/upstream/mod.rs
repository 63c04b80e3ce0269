//! Upstream seam: the gateway only sees `UpstreamProvider`.

mod client;
mod error;

use std::pin::Pin;

use async_trait::async_trait;
use claude_proxy_types::protocol::claude::{MessagesRequest, MessagesResponse, StreamEvent};
use futures::Stream;

pub use client::AnthropicClient;
pub use error::UpstreamError;

/// Incremental events of one streaming call.
pub type UpstreamEventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, UpstreamError>> + Send>>;

/// A completed (non-streaming) upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl From<MessagesResponse> for UpstreamResponse {
    fn from(resp: MessagesResponse) -> Self {
        Self {
            text: resp.text(),
            input_tokens: resp.usage.input_tokens,
            output_tokens: resp.usage.output_tokens,
        }
    }
}

/// "Submit a request, get a response or a sequence of delta events."
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    async fn create_message(&self, params: &MessagesRequest) -> Result<UpstreamResponse, UpstreamError>;

    /// Opens the stream. Errors here happen before any byte reaches the caller.
    async fn stream_message(&self, params: &MessagesRequest) -> Result<UpstreamEventStream, UpstreamError>;
}
