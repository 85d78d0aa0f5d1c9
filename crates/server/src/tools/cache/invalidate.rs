//! cache_invalidate tool implementation.
//!
//! Called by mutation flows when a title is rated for the first time or
//! removed, so cached searches stop serving it under its old state.

use reel_client::SearchOrchestrator;
use reel_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    /// Internal title id or metadata id.
    pub identifier: String,
}

/// Output from the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Number of cached searches removed.
    pub removed: usize,
}

/// Implementation of the cache_invalidate tool.
pub async fn invalidate_impl(
    orchestrator: &SearchOrchestrator, params: CacheInvalidateParams,
) -> Result<CallToolResult, McpError> {
    let identifier = params.identifier.trim();
    if identifier.is_empty() {
        return Err(Error::InvalidInput("identifier cannot be empty".to_string()).into());
    }

    let removed = orchestrator.invalidate(identifier).await;
    tracing::info!(identifier, removed, "invalidated cached searches");

    let output = CacheInvalidateOutput { removed };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
