//! Proxy configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Upstream model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
/// Anthropic API root.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Process-wide configuration, built once at startup and shared read-only.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyConfig {
    /// Bearer token callers must present.
    pub api_key: String,

    /// Credential forwarded to the Anthropic API.
    pub anthropic_api_key: String,

    /// Anthropic API root (overridable for testing or regional endpoints).
    #[serde(default = "default_base_url")]
    pub anthropic_base_url: String,

    /// Upstream model identifier for every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upstream request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,

    /// Temperature applied only when a request omits one. Unset means the
    /// field is left out of the upstream call entirely.
    #[serde(default)]
    pub default_temperature: Option<f32>,

    /// `max_tokens` applied when a request omits one.
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

fn default_base_url() -> String {
    DEFAULT_ANTHROPIC_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl ProxyConfig {
    /// Config with both credentials set and everything else defaulted.
    pub fn new(api_key: impl Into<String>, anthropic_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            anthropic_api_key: anthropic_api_key.into(),
            anthropic_base_url: default_base_url(),
            model: default_model(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_temperature: None,
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::missing("api_key"));
        }
        if self.anthropic_api_key.trim().is_empty() {
            return Err(ConfigError::missing("anthropic_api_key"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }
        if !self.anthropic_base_url.starts_with("http://")
            && !self.anthropic_base_url.starts_with("https://")
        {
            return Err(ConfigError::invalid(
                "anthropic_base_url",
                format!("expected an http(s) URL, got '{}'", self.anthropic_base_url),
            ));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::invalid("request_timeout", "must be greater than zero"));
        }
        if self.default_max_tokens == 0 {
            return Err(ConfigError::invalid("default_max_tokens", "must be greater than zero"));
        }
        if let Some(t) = self.default_temperature {
            if !(0.0..=1.0).contains(&t) {
                return Err(ConfigError::invalid(
                    "default_temperature",
                    format!("must be within 0.0..=1.0, got {}", t),
                ));
            }
        }
        Ok(())
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_key", &"<redacted>")
            .field("anthropic_api_key", &"<redacted>")
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .finish()
    }
}
