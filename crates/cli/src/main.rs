//! reel interactive front-end.
//!
//! Each line on stdin is the current contents of the search box. Lines are
//! debounced before they reach the orchestrator; every published result set
//! is printed to stdout. Logs go to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use reel_client::{Debouncer, SearchOrchestrator};
use reel_core::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let orchestrator =
        Arc::new(SearchOrchestrator::from_config(&config).context("failed to build search backends")?);

    let mut published = orchestrator.subscribe();
    let printer = tokio::spawn(async move {
        while published.changed().await.is_ok() {
            let text = render::render(&published.borrow_and_update());
            print!("{text}");
        }
    });

    let debouncer = Debouncer::spawn(orchestrator.clone(), config.debounce());
    tracing::debug!(debounce = ?config.debounce(), "reading queries from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = None;
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        debouncer.push(line.clone());
        last = Some(line);
    }

    // Input ended: skip the quiet period and settle the final query directly.
    drop(debouncer);
    printer.abort();
    if let Some(last) = last {
        match orchestrator.search(&last).await {
            Ok(_) => print!("{}", render::render(&orchestrator.subscribe().borrow())),
            Err(err) => tracing::error!(query = %last, error = %err, "search failed"),
        }
    }

    Ok(())
}
