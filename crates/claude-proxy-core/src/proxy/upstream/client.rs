use std::time::Duration;

use async_trait::async_trait;
use claude_proxy_types::protocol::claude::{
    ApiErrorResponse, MessagesRequest, MessagesResponse, StreamEvent,
};
use claude_proxy_types::ProxyConfig;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::{future, StreamExt};
use reqwest::Client;
use serde::Serialize;

use super::{UpstreamError, UpstreamEventStream, UpstreamProvider, UpstreamResponse};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Wire body: the call params plus the `stream` flag.
#[derive(Serialize)]
struct WireRequest<'a> {
    #[serde(flatten)]
    params: &'a MessagesRequest,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
}

impl AnthropicClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        // read_timeout bounds each idle gap, not the whole generation.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout))
            .read_timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| UpstreamError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/messages", config.anthropic_base_url.trim_end_matches('/')),
            api_key: config.anthropic_api_key.clone(),
            timeout_secs: config.request_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, params: &MessagesRequest, stream: bool) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&WireRequest { params, stream })
    }

    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("[Upstream] Failed to read {} error body: {}", status.as_u16(), e);
                format!("failed to read error body: {}", e)
            },
        };
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
            _ => body,
        };
        tracing::warn!("[Upstream] Anthropic returned {}: {}", status.as_u16(), message);
        Err(UpstreamError::Status { status: status.as_u16(), message })
    }
}

#[async_trait]
impl UpstreamProvider for AnthropicClient {
    async fn create_message(&self, params: &MessagesRequest) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(
            "[Upstream] POST {} model={} messages={}",
            self.endpoint,
            params.model,
            params.messages.len()
        );

        let resp = self
            .request(params, false)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_secs))?;
        let resp = self.check_status(resp).await?;

        let body: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_secs))?;

        tracing::debug!(
            "[Upstream] Response {} stop_reason={:?} usage={}/{}",
            body.id,
            body.stop_reason,
            body.usage.input_tokens,
            body.usage.output_tokens
        );
        Ok(body.into())
    }

    async fn stream_message(&self, params: &MessagesRequest) -> Result<UpstreamEventStream, UpstreamError> {
        tracing::debug!(
            "[Upstream] POST {} (stream) model={} messages={}",
            self.endpoint,
            params.model,
            params.messages.len()
        );

        let secs = self.timeout_secs;
        let resp = tokio::time::timeout(Duration::from_secs(secs), self.request(params, true).send())
            .await
            .map_err(|_| UpstreamError::Timeout { secs })?
            .map_err(|e| UpstreamError::from_reqwest(e, secs))?;
        let resp = self.check_status(resp).await?;

        let events = resp.bytes_stream().eventsource().filter_map(move |item| {
            future::ready(match item {
                Ok(event) if event.data.trim().is_empty() => None,
                Ok(event) => Some(serde_json::from_str::<StreamEvent>(&event.data).map_err(|e| {
                    UpstreamError::Decode(format!("{} in event '{}': {}", e, event.event, event.data))
                })),
                Err(EventStreamError::Transport(e)) => Some(Err(UpstreamError::from_stream_reqwest(e, secs))),
                Err(e) => Some(Err(UpstreamError::Stream(e.to_string()))),
            })
        });

        Ok(Box::pin(events))
    }
}
