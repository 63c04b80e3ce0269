//! Domain models.

pub mod config;

pub use config::ProxyConfig;
