//! Proxy module - OpenAI-compatible front door for the Anthropic Messages API
//!
//! - `mappers`: schema translation and stream re-segmentation (pure logic)
//! - `handlers`: axum endpoints
//! - `middleware`: bearer-token auth
//! - `upstream`: the Anthropic client behind the `UpstreamProvider` seam
//! - `server`: router assembly

pub mod handlers;
pub mod mappers;
pub mod middleware;
pub mod server;
pub mod upstream;

pub use server::{build_proxy_router, AppState};
