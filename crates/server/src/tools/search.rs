//! title_search and search_cancel tool implementations.
//!
//! Every call supersedes the previous one, the same way keystrokes in a search
//! box do. A superseded call returns successfully with status `superseded`.

use reel_client::{HitSource, SearchError, SearchOrchestrator, SearchOutcome};
use reel_core::{Error, SearchHit};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for title_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TitleSearchParams {
    /// Current contents of the search box. One character or less clears the results.
    pub query: String,
}

/// How a search call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Results,
    Cleared,
    Superseded,
}

/// Output structure for title_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TitleSearchOutput {
    pub status: SearchStatus,
    /// Normalized query the hits belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Whether the hits were served from the result cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_hit: Option<bool>,
    /// One backend failed; hits come from the other only.
    #[serde(default)]
    pub degraded: bool,
    /// Rated hits first, then unrated ones.
    pub hits: Vec<SearchHit>,
}

impl From<SearchOutcome> for TitleSearchOutput {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Hits { query, hits, source, degraded } => Self {
                status: SearchStatus::Results,
                query: Some(query.into_string()),
                cache_hit: Some(source == HitSource::Cache),
                degraded,
                hits,
            },
            SearchOutcome::Cleared => {
                Self { status: SearchStatus::Cleared, query: None, cache_hit: None, degraded: false, hits: Vec::new() }
            }
            SearchOutcome::Superseded => Self {
                status: SearchStatus::Superseded,
                query: None,
                cache_hit: None,
                degraded: false,
                hits: Vec::new(),
            },
        }
    }
}

/// Output structure for search_cancel tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchCancelOutput {
    pub cancelled: bool,
}

/// Implementation of the title_search tool.
pub async fn search_impl(
    orchestrator: &SearchOrchestrator, params: TitleSearchParams,
) -> Result<CallToolResult, McpError> {
    let outcome = orchestrator.search(&params.query).await.map_err(|e| match e {
        SearchError::BothBackendsFailed { .. } => Error::SearchFailed(e.to_string()),
    })?;

    let output = TitleSearchOutput::from(outcome);
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Implementation of the search_cancel tool.
pub async fn cancel_impl(orchestrator: &SearchOrchestrator) -> Result<CallToolResult, McpError> {
    orchestrator.cancel().await;

    let json = serde_json::to_string_pretty(&SearchCancelOutput { cancelled: true })
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
