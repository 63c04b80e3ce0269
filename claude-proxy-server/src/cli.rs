use clap::{Parser, ValueEnum};
use claude_proxy_types::models::config::{
    DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use claude_proxy_types::ProxyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable
    Text,
}

#[derive(Parser, Debug)]
#[command(
    name = "claude-proxy",
    about = "OpenAI-compatible chat completions gateway for the Anthropic API",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    /// Bearer token clients must send
    #[arg(long, env = "CLAUDE_PROXY_API_KEY", hide_env_values = true)]
    pub proxy_api_key: String,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: String,

    #[arg(long, env = "ANTHROPIC_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_ANTHROPIC_BASE_URL)]
    pub anthropic_base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Used only when a request has no temperature of its own
    #[arg(long, env = "MODEL_TEMPERATURE")]
    pub temperature: Option<f32>,

    #[arg(long, env = "MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            api_key: self.proxy_api_key.clone(),
            anthropic_api_key: self.anthropic_api_key.clone(),
            anthropic_base_url: self.anthropic_base_url.clone(),
            model: self.model.clone(),
            request_timeout: self.request_timeout,
            default_temperature: self.temperature,
            default_max_tokens: self.max_tokens,
        }
    }
}
