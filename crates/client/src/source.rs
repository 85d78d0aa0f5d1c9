//! Backend seams consumed by the orchestrator.
//!
//! The orchestrator only sees these traits, so tests and alternative
//! deployments inject their own sources instead of the HTTP clients.

use async_trait::async_trait;
use reel_core::{RatedTitle, UnratedTitle};
use tokio_util::sync::CancellationToken;

use crate::BackendError;

/// Fast backend holding titles that already have ratings.
#[async_trait]
pub trait RatedTitleSource: Send + Sync {
    /// Search for rated titles. Must return [`BackendError::Cancelled`]
    /// promptly once `cancel` fires, aborting any request in flight.
    async fn search(&self, query: &str, cancel: &CancellationToken) -> Result<Vec<RatedTitle>, BackendError>;
}

/// Slower backend holding every known title.
#[async_trait]
pub trait UnratedTitleSource: Send + Sync {
    /// Search for candidate titles. Single attempt.
    async fn search(&self, title: &str) -> Result<Vec<UnratedTitle>, BackendError>;
}
