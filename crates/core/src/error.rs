//! Unified error types for reel.
//!
//! Outer surfaces convert client failures into these before reporting them.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::config::ConfigError;

/// Unified error types for the reel binaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty identifier).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Both search backends failed for the same query.
    #[error("SEARCH_FAILED: {0}")]
    SearchFailed(String),

    /// A backend could not be constructed or reached.
    #[error("BACKEND_ERROR: {0}")]
    Backend(String),

    /// Configuration could not be loaded or is incomplete.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::SearchFailed(msg) => (-32020, msg.clone()),
            Error::Backend(msg) => (-32021, msg.clone()),
            Error::Config(e) => (-32022, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
