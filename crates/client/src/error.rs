//! Backend client error types.

use std::sync::Arc;

/// Errors from a single search backend call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Missing API key or application id.
    #[error("missing credentials: {0}")]
    MissingApiKey(&'static str),

    /// Invalid search query or endpoint configuration.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error (connect, reset, DNS).
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request was superseded and aborted. Expected control flow, not a failure.
    #[error("request cancelled")]
    Cancelled,
}

impl BackendError {
    /// Whether another host may succeed where this attempt failed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::HttpError { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { BackendError::Timeout } else { BackendError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::MissingApiKey("index");
        assert!(err.to_string().contains("index"));

        let err = BackendError::HttpError { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(BackendError::Timeout.is_retryable());
        assert!(BackendError::HttpError { status: 500 }.is_retryable());
        assert!(BackendError::HttpError { status: 503 }.is_retryable());
        assert!(BackendError::HttpError { status: 429 }.is_retryable());
        assert!(!BackendError::HttpError { status: 404 }.is_retryable());
        assert!(!BackendError::HttpError { status: 403 }.is_retryable());
        assert!(!BackendError::Parse("bad json".into()).is_retryable());
        assert!(!BackendError::Cancelled.is_retryable());
    }

    #[test]
    fn test_cancelled_is_distinguishable() {
        assert!(BackendError::Cancelled.is_cancelled());
        assert!(!BackendError::Timeout.is_cancelled());
    }
}
