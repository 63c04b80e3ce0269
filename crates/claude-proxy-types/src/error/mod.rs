//! Typed error definitions shared across crates.
//!
//! Request-time errors (`GatewayError`, `UpstreamError`) live in
//! `claude-proxy-core` next to the HTTP layer that renders them; this module
//! only carries errors that can be raised before a server exists.

mod config;

pub use config::ConfigError;
