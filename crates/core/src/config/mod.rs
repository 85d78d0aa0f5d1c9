//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (REEL_*)
//! 2. TOML config file (if REEL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (REEL_*)
/// 2. TOML config file (if REEL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search index application id. Also names the index hosts.
    ///
    /// Set via REEL_INDEX_APP_ID environment variable.
    #[serde(default)]
    pub index_app_id: Option<String>,

    /// Search-only API key for the index.
    ///
    /// Set via REEL_INDEX_API_KEY environment variable.
    #[serde(default)]
    pub index_api_key: Option<String>,

    /// Name of the index holding rated titles.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Number of fallback hosts tried after the canonical one.
    ///
    /// Set via REEL_INDEX_FALLBACK_HOSTS environment variable.
    #[serde(default = "default_fallback_hosts")]
    pub index_fallback_hosts: usize,

    /// Explicit host list (canonical first) replacing the derived naming scheme.
    ///
    /// Used for self-hosted index deployments and tests.
    #[serde(default)]
    pub index_hosts: Vec<String>,

    /// Maximum rated hits requested per search.
    #[serde(default = "default_hits_per_page")]
    pub hits_per_page: u32,

    /// Metadata API key for unrated title lookups.
    ///
    /// Set via REEL_METADATA_API_KEY environment variable.
    #[serde(default)]
    pub metadata_api_key: Option<String>,

    /// Base URL of the metadata API.
    #[serde(default = "default_metadata_base_url")]
    pub metadata_base_url: String,

    /// Response language for metadata lookups.
    #[serde(default = "default_metadata_language")]
    pub metadata_language: String,

    /// Result cache budget, in cached hits.
    ///
    /// Set via REEL_CACHE_BUDGET environment variable.
    #[serde(default = "default_cache_budget")]
    pub cache_budget: usize,

    /// Quiet period after the last keystroke before searching.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-attempt HTTP timeout in milliseconds.
    ///
    /// Set via REEL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_index_name() -> String {
    "titles".into()
}

fn default_fallback_hosts() -> usize {
    3
}

fn default_hits_per_page() -> u32 {
    10
}

fn default_metadata_base_url() -> String {
    "https://api.themoviedb.org/3".into()
}

fn default_metadata_language() -> String {
    "en-US".into()
}

fn default_cache_budget() -> usize {
    crate::cache::DEFAULT_COST_BUDGET
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    "reel/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            index_app_id: None,
            index_api_key: None,
            index_name: default_index_name(),
            index_fallback_hosts: default_fallback_hosts(),
            index_hosts: Vec::new(),
            hits_per_page: default_hits_per_page(),
            metadata_api_key: None,
            metadata_base_url: default_metadata_base_url(),
            metadata_language: default_metadata_language(),
            cache_budget: default_cache_budget(),
            debounce_ms: default_debounce_ms(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `REEL_`
    /// 2. TOML file from `REEL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("REEL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("REEL_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Index credentials, checked when the index client is built.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the application id or API key is not set.
    pub fn require_index_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let app_id = self.index_app_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "index_app_id".into(),
            hint: "Set REEL_INDEX_APP_ID environment variable".into(),
        })?;
        let api_key = self.index_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "index_api_key".into(),
            hint: "Set REEL_INDEX_API_KEY environment variable".into(),
        })?;
        Ok((app_id, api_key))
    }

    /// Metadata API key, checked when the metadata client is built.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_metadata_api_key(&self) -> Result<&str, ConfigError> {
        self.metadata_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "metadata_api_key".into(),
            hint: "Set REEL_METADATA_API_KEY environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.index_name, "titles");
        assert_eq!(config.index_fallback_hosts, 3);
        assert!(config.index_hosts.is_empty());
        assert_eq!(config.hits_per_page, 10);
        assert_eq!(config.metadata_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.metadata_language, "en-US");
        assert_eq!(config.cache_budget, 500);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.user_agent, "reel/0.1");
        assert!(config.index_app_id.is_none());
        assert!(config.metadata_api_key.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(5_000));
        assert_eq!(config.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_require_index_credentials() {
        let config = AppConfig::default();
        assert!(matches!(
            config.require_index_credentials(),
            Err(ConfigError::Missing { field, .. }) if field == "index_app_id"
        ));

        let config = AppConfig { index_app_id: Some("APP".into()), ..Default::default() };
        assert!(matches!(
            config.require_index_credentials(),
            Err(ConfigError::Missing { field, .. }) if field == "index_api_key"
        ));

        let config =
            AppConfig { index_app_id: Some("APP".into()), index_api_key: Some("key".into()), ..Default::default() };
        assert_eq!(config.require_index_credentials().unwrap(), ("APP", "key"));
    }

    #[test]
    fn test_require_metadata_api_key() {
        let config = AppConfig::default();
        assert!(matches!(config.require_metadata_api_key(), Err(ConfigError::Missing { .. })));

        let config = AppConfig { metadata_api_key: Some("tmdb".into()), ..Default::default() };
        assert_eq!(config.require_metadata_api_key().unwrap(), "tmdb");
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "reel.toml",
                r#"
                index_app_id = "FILEAPP"
                cache_budget = 50
                index_hosts = ["http://127.0.0.1:7700"]
                "#,
            )?;
            jail.set_env("REEL_CONFIG_FILE", "reel.toml");
            jail.set_env("REEL_CACHE_BUDGET", "75");
            jail.set_env("REEL_INDEX_API_KEY", "envkey");

            let config = AppConfig::load().expect("config loads");
            assert_eq!(config.index_app_id.as_deref(), Some("FILEAPP"));
            assert_eq!(config.index_api_key.as_deref(), Some("envkey"));
            assert_eq!(config.cache_budget, 75);
            assert_eq!(config.index_hosts, vec!["http://127.0.0.1:7700".to_string()]);
            assert_eq!(config.debounce_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("REEL_CACHE_BUDGET", "0");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { field, .. }) if field == "cache_budget"));
            Ok(())
        });
    }
}
