//! reel MCP server entry point.
//!
//! Boots the title search server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use reel_client::SearchOrchestrator;
use reel_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let orchestrator = SearchOrchestrator::from_config(&config).context("failed to build search backends")?;

    tracing::info!(
        index = %config.index_name,
        cache_budget = config.cache_budget,
        "Starting reel server on stdio transport"
    );

    let handler = handler::TitleSearchServer::new(Arc::new(orchestrator));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
