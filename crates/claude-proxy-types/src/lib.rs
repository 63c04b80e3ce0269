//! # Claude Proxy Types
//!
//! Wire types, configuration, and error definitions for Claude Proxy.
//!
//! - **`error`** - Typed configuration errors
//! - **`models`** - Process configuration (`ProxyConfig`)
//! - **`protocol`** - OpenAI ChatCompletions and Anthropic Messages wire types
//!
//! ## Architecture Role
//!
//! ```text
//!        claude-proxy-types (this crate)
//!                  │
//!                  ▼
//!         claude-proxy-core
//!                  │
//!                  ▼
//!        claude-proxy-server
//! ```

pub mod error;
pub mod models;
pub mod protocol;

pub use error::ConfigError;
pub use models::ProxyConfig;
