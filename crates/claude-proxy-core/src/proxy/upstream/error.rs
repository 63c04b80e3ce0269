//! Errors raised while talking to the Anthropic API.

use thiserror::Error;

/// Failure of an upstream call, in either the non-streaming or streaming path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Could not reach the API.
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out after {secs}s")]
    Timeout {
        /// Configured timeout that expired.
        secs: u64,
    },

    /// Non-2xx HTTP response.
    #[error("Status {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },

    /// Error event reported in-band on an open stream.
    #[error("{message}")]
    Api {
        kind: String,
        message: String,
    },

    /// Body or event payload did not match the expected schema.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The event stream broke after it was opened.
    #[error("Stream error: {0}")]
    Stream(String),
}

impl UpstreamError {
    /// Error category name, as reported in gateway error messages.
    pub fn category(&self) -> &str {
        match self {
            Self::Connection(_) | Self::Stream(_) => "APIConnectionError",
            Self::Timeout { .. } => "APITimeoutError",
            Self::Status { .. } => "APIStatusError",
            Self::Api { kind, .. } => kind,
            Self::Decode(_) => "APIResponseValidationError",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { secs: timeout_secs }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }

    /// Transport failure on an already open event stream.
    pub(crate) fn from_stream_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { secs: timeout_secs }
        } else {
            Self::Stream(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(UpstreamError::Connection("x".into()).category(), "APIConnectionError");
        assert_eq!(UpstreamError::Stream("x".into()).category(), "APIConnectionError");
        assert_eq!(UpstreamError::Timeout { secs: 1 }.category(), "APITimeoutError");
        assert_eq!(
            UpstreamError::Status { status: 400, message: "x".into() }.category(),
            "APIStatusError"
        );
        assert_eq!(UpstreamError::Decode("x".into()).category(), "APIResponseValidationError");
        assert_eq!(
            UpstreamError::Api { kind: "overloaded_error".into(), message: "x".into() }.category(),
            "overloaded_error"
        );
    }

    #[test]
    fn test_api_error_displays_bare_message() {
        let err = UpstreamError::Api { kind: "overloaded_error".into(), message: "Overloaded".into() };
        assert_eq!(err.to_string(), "Overloaded");
    }
}
