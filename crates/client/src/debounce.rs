//! Keystroke debouncing in front of the orchestrator.
//!
//! A timer task waits for a quiet period after the latest keystroke and then
//! starts a search for it. Searches run as their own tasks so a newer query
//! can supersede an older fetch. Results reach callers through
//! [`SearchOrchestrator::subscribe`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::orchestrator::SearchOrchestrator;

/// Handle to a running debounce task. Dropping it stops the timer.
#[derive(Debug)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl Debouncer {
    /// Start the timer task. Must be called within a tokio runtime.
    pub fn spawn(orchestrator: Arc<SearchOrchestrator>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(orchestrator, delay, rx));
        Self { tx, task }
    }

    /// Record the current contents of the search box.
    pub fn push(&self, query: impl Into<String>) {
        // The receiver only goes away when the task was aborted.
        let _ = self.tx.send(query.into());
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(orchestrator: Arc<SearchOrchestrator>, delay: Duration, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(query) => latest = query,
                    None => break,
                },
                _ = tokio::time::sleep(delay) => break,
            }
        }

        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            match orchestrator.search(&latest).await {
                Ok(outcome) => tracing::trace!(query = %latest, ?outcome, "debounced search finished"),
                Err(err) => tracing::debug!(query = %latest, error = %err, "debounced search failed"),
            }
        });
    }
}
