//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Most fallback hosts an index deployment exposes under the naming scheme.
pub const MAX_FALLBACK_HOSTS: usize = 8;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `index_fallback_hosts` exceeds 8
    /// - `hits_per_page` is outside 1..=100
    /// - `cache_budget` is 0
    /// - `debounce_ms` exceeds 10 seconds
    /// - `timeout_ms` is less than 100ms or exceeds 60 seconds
    /// - `index_name`, `metadata_base_url` or `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_fallback_hosts > MAX_FALLBACK_HOSTS {
            return Err(ConfigError::Invalid {
                field: "index_fallback_hosts".into(),
                reason: format!("must not exceed {MAX_FALLBACK_HOSTS}"),
            });
        }

        if self.index_name.is_empty() {
            return Err(ConfigError::Invalid { field: "index_name".into(), reason: "must not be empty".into() });
        }

        if !(1..=100).contains(&self.hits_per_page) {
            return Err(ConfigError::Invalid { field: "hits_per_page".into(), reason: "must be between 1 and 100".into() });
        }

        if self.cache_budget == 0 {
            return Err(ConfigError::Invalid { field: "cache_budget".into(), reason: "must be greater than 0".into() });
        }

        if self.debounce_ms > 10_000 {
            return Err(ConfigError::Invalid {
                field: "debounce_ms".into(),
                reason: "must not exceed 10 seconds (10000ms)".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 60 seconds (60000ms)".into(),
            });
        }

        if self.metadata_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "metadata_base_url".into(), reason: "must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if !self.index_hosts.is_empty() && self.index_hosts.len() != self.index_fallback_hosts + 1 {
            tracing::warn!(
                hosts = self.index_hosts.len(),
                fallback_hosts = self.index_fallback_hosts,
                "explicit index_hosts overrides index_fallback_hosts; \
                 every listed host after the first is a fallback"
            );
        }

        Ok(())
    }
}
