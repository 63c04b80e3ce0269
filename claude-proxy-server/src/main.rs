//! Claude Proxy Server - Headless Daemon
//!
//! Serves an OpenAI-compatible `/v1/chat/completions` endpoint backed by the
//! Anthropic Messages API.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod cli;
mod logging;
mod server_utils;

use claude_proxy_core::{build_proxy_router, AnthropicClient, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format)?;

    let config = cli.proxy_config();
    config.validate().context("Invalid configuration")?;
    info!("Configuration loaded: {:?}", config);

    let upstream = AnthropicClient::new(&config).context("Failed to build Anthropic client")?;
    info!("Forwarding to {} as model {}", upstream.endpoint(), config.model);

    let app = build_proxy_router(AppState::new(config, Arc::new(upstream)));

    let addr = cli.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(server_utils::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
