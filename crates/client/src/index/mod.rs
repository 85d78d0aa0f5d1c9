//! Search index client for rated titles.
//!
//! Provides a client for an Algolia-compatible query API served by several
//! interchangeable hosts, with bounded failover and cooperative cancellation.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {host}/1/indexes/{index}/query`
//! - **Authentication**: `X-Algolia-Application-Id` and `X-Algolia-API-Key` headers.
//! - **Hosts**: canonical `https://{app}-dsn.algolia.net`, fallbacks
//!   `https://{app}-{n}.algolianet.com` for `n` in `1..=fallbacks`.
//! - **Retries**:
//!   - First attempt always goes to the canonical host.
//!   - Connect errors, timeouts, 5xx and 429 move on to the next fallback host
//!     in a per-client shuffled order.
//!   - Once every host failed, the last failure is returned.
//! - **Cancellation**: the request future is raced against the token and
//!   dropped when it fires, which aborts the HTTP connection.

pub mod request;
pub mod response;

pub use request::IndexQuery;
pub use response::{IndexApiResponse, IndexHit};

use async_trait::async_trait;
use reel_core::{AppConfig, RatedTitle};
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::BackendError;
use crate::hosts::{HostRotator, HostSlot};
use crate::source::RatedTitleSource;

/// Default fallback host count for the derived naming scheme.
pub const DEFAULT_FALLBACK_HOSTS: usize = 3;

/// Default per-attempt timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "reel/0.1";

/// Canonical host for an application id.
pub fn canonical_host(app_id: &str) -> String {
    format!("https://{}-dsn.algolia.net", app_id.to_lowercase())
}

/// Fallback host `n` (1-based) for an application id.
pub fn fallback_host(app_id: &str, n: usize) -> String {
    format!("https://{}-{}.algolianet.com", app_id.to_lowercase(), n)
}

/// Index client configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    /// Canonical host first, then the fallbacks.
    pub hosts: Vec<Url>,
    pub hits_per_page: u32,
    /// Per-attempt timeout (default: 5s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl IndexConfig {
    /// Configuration using the derived host naming scheme.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self, BackendError> {
        let app_id = app_id.into();
        let hosts = derived_hosts(&app_id, DEFAULT_FALLBACK_HOSTS)?;
        Ok(Self {
            app_id,
            api_key: api_key.into(),
            index_name: "titles".to_string(),
            hosts,
            hits_per_page: 10,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Build from application configuration.
    ///
    /// Uses `index_hosts` verbatim when set, otherwise derives
    /// `index_fallback_hosts` fallbacks from the application id.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, BackendError> {
        let (app_id, api_key) = config
            .require_index_credentials()
            .map_err(|_| BackendError::MissingApiKey("index application id and API key"))?;

        let hosts = if config.index_hosts.is_empty() {
            derived_hosts(app_id, config.index_fallback_hosts)?
        } else {
            config
                .index_hosts
                .iter()
                .map(|h| parse_host(h))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            app_id: app_id.to_string(),
            api_key: api_key.to_string(),
            index_name: config.index_name.clone(),
            hosts,
            hits_per_page: config.hits_per_page,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Replace the host list (canonical first).
    pub fn with_hosts(mut self, hosts: Vec<Url>) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn derived_hosts(app_id: &str, fallbacks: usize) -> Result<Vec<Url>, BackendError> {
    std::iter::once(canonical_host(app_id))
        .chain((1..=fallbacks).map(|n| fallback_host(app_id, n)))
        .map(|h| parse_host(&h))
        .collect()
}

fn parse_host(raw: &str) -> Result<Url, BackendError> {
    Url::parse(raw).map_err(|e| BackendError::InvalidQuery(format!("invalid index host {raw}: {e}")))
}

/// Search index client.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: reqwest::Client,
    config: IndexConfig,
    rotator: Arc<HostRotator>,
}

impl IndexClient {
    /// Create a new index client. The fallback order is shuffled here, once.
    pub fn new(config: IndexConfig) -> Result<Self, BackendError> {
        let rotator = HostRotator::new(config.hosts.len().saturating_sub(1));
        Self::with_rotator(config, rotator)
    }

    /// Create a client with a predetermined fallback order.
    pub fn with_rotator(config: IndexConfig, rotator: HostRotator) -> Result<Self, BackendError> {
        if config.app_id.is_empty() || config.api_key.is_empty() {
            return Err(BackendError::MissingApiKey("index application id and API key"));
        }
        if config.hosts.is_empty() {
            return Err(BackendError::InvalidQuery("at least one index host is required".to_string()));
        }
        if rotator.fallback_count() + 1 != config.hosts.len() {
            return Err(BackendError::InvalidQuery(format!(
                "host rotator covers {} fallbacks but {} hosts are configured",
                rotator.fallback_count(),
                config.hosts.len()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| BackendError::Network(Arc::new(e)))?;

        Ok(Self { http, config, rotator: Arc::new(rotator) })
    }

    fn host(&self, slot: HostSlot) -> &Url {
        match slot {
            HostSlot::Canonical => &self.config.hosts[0],
            HostSlot::Fallback(i) => &self.config.hosts[i + 1],
        }
    }

    /// Search rated titles, failing over across hosts.
    pub async fn search(&self, query: &str, cancel: &CancellationToken) -> Result<Vec<RatedTitle>, BackendError> {
        let start = Instant::now();
        let mut retries_remaining = self.rotator.fallback_count();

        loop {
            if cancel.is_cancelled() {
                return Err(BackendError::Cancelled);
            }

            let Some(slot) = self.rotator.host_at(retries_remaining) else {
                return Err(BackendError::InvalidQuery("host attempt out of range".to_string()));
            };
            let host = self.host(slot);

            tracing::debug!(query, host = %host, retries_remaining, "querying index");

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(query, host = %host, "index request cancelled");
                    return Err(BackendError::Cancelled);
                }
                result = self.query_host(host, query) => result,
            };

            match attempt {
                Ok(titles) => {
                    tracing::debug!(query, hits = titles.len(), elapsed = ?start.elapsed(), "index search completed");
                    return Ok(titles);
                }
                Err(err) if err.is_retryable() && retries_remaining > 0 => {
                    tracing::debug!(query, host = %host, error = %err, "index host failed, trying next host");
                    retries_remaining -= 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        tracing::warn!(
                            query,
                            attempts = self.rotator.attempt_budget(),
                            error = %err,
                            "every index host failed"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }

    /// One request against one host.
    async fn query_host(&self, host: &Url, query: &str) -> Result<Vec<RatedTitle>, BackendError> {
        let mut url = host.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidQuery(format!("index host cannot be a base URL: {host}")))?
            .pop_if_empty()
            .extend(["1", "indexes", self.config.index_name.as_str(), "query"]);

        let http_response = self
            .http
            .post(url)
            .header("X-Algolia-Application-Id", &self.config.app_id)
            .header("X-Algolia-API-Key", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&IndexQuery::new(query, self.config.hits_per_page))
            .send()
            .await?;

        let status = http_response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(BackendError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: IndexApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(api_response.into_titles())
    }
}

#[async_trait]
impl RatedTitleSource for IndexClient {
    async fn search(&self, query: &str, cancel: &CancellationToken) -> Result<Vec<RatedTitle>, BackendError> {
        IndexClient::search(self, query, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn batman_body() -> serde_json::Value {
        json!({
            "hits": [
                {"objectID": "tt1", "title": "Batman", "releaseDate": "1989-06-23", "mediaType": "movie", "tmdbId": 268}
            ]
        })
    }

    fn config_for(hosts: Vec<String>) -> IndexConfig {
        IndexConfig::new("APP", "search-key")
            .unwrap()
            .with_hosts(hosts.iter().map(|h| Url::parse(h).unwrap()).collect())
            .with_timeout(Duration::from_secs(2))
    }

    /// Fallbacks in list order, so tests can tell which host is next.
    fn client_for(hosts: Vec<String>) -> IndexClient {
        let rotator = HostRotator::in_order(hosts.len() - 1);
        IndexClient::with_rotator(config_for(hosts), rotator).unwrap()
    }

    async fn failing_server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    async fn ok_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batman_body()))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_derived_host_names() {
        let config = IndexConfig::new("MyApp", "key").unwrap();
        let hosts: Vec<&str> = config.hosts.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            hosts,
            vec![
                "https://myapp-dsn.algolia.net/",
                "https://myapp-1.algolianet.com/",
                "https://myapp-2.algolianet.com/",
                "https://myapp-3.algolianet.com/",
            ]
        );
    }

    #[test]
    fn test_from_app_config() {
        let app = AppConfig {
            index_app_id: Some("APP".into()),
            index_api_key: Some("key".into()),
            index_fallback_hosts: 1,
            ..Default::default()
        };
        let config = IndexConfig::from_app_config(&app).unwrap();
        assert_eq!(config.hosts.len(), 2);
        assert_eq!(config.index_name, "titles");

        let app = AppConfig { index_hosts: vec!["http://127.0.0.1:7700".into()], ..app };
        let config = IndexConfig::from_app_config(&app).unwrap();
        assert_eq!(config.hosts.len(), 1);
    }

    #[test]
    fn test_from_app_config_missing_credentials() {
        let result = IndexConfig::from_app_config(&AppConfig::default());
        assert!(matches!(result, Err(BackendError::MissingApiKey(_))));
    }

    #[test]
    fn test_client_new_missing_key() {
        let config = IndexConfig::new("APP", "").unwrap();
        assert!(matches!(IndexClient::new(config), Err(BackendError::MissingApiKey(_))));
    }

    #[tokio::test]
    async fn test_request_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/indexes/titles/query"))
            .and(header("X-Algolia-Application-Id", "APP"))
            .and(header("X-Algolia-API-Key", "search-key"))
            .and(body_json(json!({"params": "query=batman&hitsPerPage=10"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(batman_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(vec![server.uri()]);
        let titles = client.search("batman", &CancellationToken::new()).await.unwrap();

        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].id, "tt1");
        assert_eq!(titles[0].external_id, Some(268));
    }

    #[tokio::test]
    async fn test_fails_over_to_next_host() {
        let canonical = failing_server(503).await;
        let fallback = ok_server().await;

        let client = client_for(vec![canonical.uri(), fallback.uri()]);
        let titles = client.search("batman", &CancellationToken::new()).await.unwrap();
        assert_eq!(titles[0].title, "Batman");
    }

    #[tokio::test]
    async fn test_connect_error_is_retried() {
        let fallback = ok_server().await;

        // Nothing listens on port 1.
        let client = client_for(vec!["http://127.0.0.1:1".to_string(), fallback.uri()]);
        let titles = client.search("batman", &CancellationToken::new()).await.unwrap();
        assert_eq!(titles.len(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_failure() {
        let canonical = failing_server(500).await;
        let first = failing_server(503).await;
        let second = failing_server(502).await;

        let client = client_for(vec![canonical.uri(), first.uri(), second.uri()]);
        let result = client.search("batman", &CancellationToken::new()).await;
        assert!(matches!(result, Err(BackendError::HttpError { status: 502 })));
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let canonical = failing_server(403).await;
        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batman_body()))
            .expect(0)
            .mount(&fallback)
            .await;

        let client = client_for(vec![canonical.uri(), fallback.uri()]);
        let result = client.search("batman", &CancellationToken::new()).await;
        assert!(matches!(result, Err(BackendError::HttpError { status: 403 })));
    }

    #[tokio::test]
    async fn test_parse_error_not_retried() {
        let canonical = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&canonical)
            .await;
        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&fallback)
            .await;

        let client = client_for(vec![canonical.uri(), fallback.uri()]);
        let result = client.search("batman", &CancellationToken::new()).await;
        assert!(matches!(result, Err(BackendError::Parse(_))));
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batman_body()).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let client = client_for(vec![server.uri()]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result = client.search("batman", &cancel).await;
        assert!(matches!(result, Err(BackendError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batman_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(vec![server.uri()]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(client.search("batman", &cancel).await, Err(BackendError::Cancelled)));
    }
}
