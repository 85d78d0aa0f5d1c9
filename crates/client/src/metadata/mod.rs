//! Metadata API client for unrated titles.
//!
//! Single-attempt client for a TMDB-compatible multi-search endpoint. There is
//! no retry budget here: a failure goes straight back to the orchestrator,
//! which decides whether it matters.
//!
//! - **Endpoint**: `GET {base}/search/multi`
//! - **Authentication**: `api_key` query parameter.
//! - **Normalization**: movies and series only; people are dropped.

pub mod response;

pub use response::{MetadataApiResponse, MetadataResult};

use async_trait::async_trait;
use reel_core::{AppConfig, UnratedTitle};
use reqwest::header;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::BackendError;
use crate::source::UnratedTitleSource;

/// Default base URL for the metadata API.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "reel/0.1";

/// Metadata client configuration.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    pub base_url: String,
    /// Response language (default: en-US).
    pub language: String,
    /// Request timeout (default: 5s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en-US".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MetadataConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self, BackendError> {
        let api_key = config
            .require_metadata_api_key()
            .map_err(|_| BackendError::MissingApiKey("metadata API key"))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.metadata_base_url.clone(),
            language: config.metadata_language.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Query parameters for the multi-search endpoint.
#[derive(Debug, Serialize)]
struct MultiSearchParams<'a> {
    query: &'a str,
    api_key: &'a str,
    language: &'a str,
    include_adult: bool,
}

/// Metadata API client.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    config: MetadataConfig,
    endpoint: Url,
}

impl MetadataClient {
    pub fn new(config: MetadataConfig) -> Result<Self, BackendError> {
        if config.api_key.is_empty() {
            return Err(BackendError::MissingApiKey("metadata API key"));
        }

        let mut endpoint = Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidQuery(format!("invalid metadata base URL: {e}")))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| BackendError::InvalidQuery("metadata base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["search", "multi"]);

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| BackendError::Network(Arc::new(e)))?;

        Ok(Self { http, config, endpoint })
    }

    /// Search every known title matching `title`.
    pub async fn search(&self, title: &str) -> Result<Vec<UnratedTitle>, BackendError> {
        let start = Instant::now();
        tracing::debug!(query = title, "searching metadata API");

        let params = MultiSearchParams {
            query: title,
            api_key: &self.config.api_key,
            language: &self.config.language,
            include_adult: false,
        };

        let http_response = self
            .http
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await?;

        let status = http_response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(BackendError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: MetadataApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| BackendError::Parse(e.to_string()))?;

        let titles = api_response.into_titles();
        tracing::debug!(query = title, hits = titles.len(), elapsed = ?start.elapsed(), "metadata search completed");

        Ok(titles)
    }
}

#[async_trait]
impl UnratedTitleSource for MetadataClient {
    async fn search(&self, title: &str) -> Result<Vec<UnratedTitle>, BackendError> {
        MetadataClient::search(self, title).await
    }
}
