//! Gateway error taxonomy and its HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use claude_proxy_types::protocol::openai::ErrorEnvelope;
use thiserror::Error;

use crate::proxy::upstream::UpstreamError;

/// Every failure a request can end in. Rendered as
/// `{"error":{"message":..,"type":"invalid_request_error"}}`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    /// Malformed body or empty conversation; no upstream call was made.
    #[error("{0}")]
    InvalidRequest(String),

    /// Missing, malformed, or wrong bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The upstream call failed or timed out.
    #[error("Anthropic API error: {} - {}", .0.category(), .0)]
    Upstream(#[from] UpstreamError),

    /// JSON mode was requested but the upstream text is not valid JSON.
    #[error("Failed to generate a valid JSON response")]
    InvalidJsonOutput,

    /// Anything else.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) | Self::InvalidJsonOutput | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::invalid_request(self.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status.as_u16(), self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
        (status, Json(self.envelope())).into_response()
    }
}
