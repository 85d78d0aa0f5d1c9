//! cache_stats tool implementation.

use reel_client::SearchOrchestrator;
use reel_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};

/// Implementation of the cache_stats tool.
pub async fn stats_impl(orchestrator: &SearchOrchestrator) -> Result<CallToolResult, McpError> {
    let stats = orchestrator.cache_stats().await;
    let json = serde_json::to_string_pretty(&stats)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
