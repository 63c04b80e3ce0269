//! # Claude Proxy Core
//!
//! Translation engine between the OpenAI ChatCompletions schema and the
//! Anthropic Messages API.
//!
//! ```text
//! claude-proxy-core/src/proxy/
//! ├── mappers/openai/   # request/response mapping, chunk segmenter, stream translator
//! ├── handlers/         # axum handlers (chat completions, models)
//! ├── middleware/       # bearer auth
//! ├── upstream/         # UpstreamProvider trait + Anthropic client
//! └── server.rs         # router assembly and AppState
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod proxy;

pub use error::{GatewayError, GatewayResult};
pub use proxy::server::{build_proxy_router, AppState};
pub use proxy::upstream::{AnthropicClient, UpstreamError, UpstreamProvider, UpstreamResponse};
