use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use claude_proxy_types::ProxyConfig;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::{GatewayError, GatewayResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Require `Authorization: Bearer <proxy api key>`.
pub async fn auth_middleware(
    State(config): State<Arc<ProxyConfig>>,
    request: Request,
    next: Next,
) -> GatewayResult<Response> {
    tracing::info!("Request: {} {}", request.method(), request.uri().path());

    check_authorization(
        request.headers().get(header::AUTHORIZATION).map(|h| h.to_str()),
        &config.api_key,
    )?;

    Ok(next.run(request).await)
}

fn check_authorization<E>(
    header_value: Option<Result<&str, E>>,
    expected: &str,
) -> GatewayResult<()> {
    let value = header_value
        .ok_or_else(|| GatewayError::Unauthorized("Missing authorization header".to_string()))?;

    let token = value
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| GatewayError::Unauthorized("Invalid authorization header".to_string()))?;

    if constant_time_compare(token, expected) {
        Ok(())
    } else {
        Err(GatewayError::Unauthorized("Invalid API key".to_string()))
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
