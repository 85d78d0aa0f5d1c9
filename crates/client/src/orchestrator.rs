//! Search orchestration: cache, supersession and backend fan-out.
//!
//! Each call to [`SearchOrchestrator::search`] moves the orchestrator through
//! `Idle -> CacheLookup -> (CacheHit | Fetching) -> (Superseded | Settled)`.
//!
//! Ordering guarantee: once a query Q2 has been issued, nothing computed for
//! an earlier query Q1 is published or cached, however late Q1's responses
//! arrive. The check happens at completion time, under the same lock that
//! guards the cache write and the publication.
//!
//! Only complete result sets are cached. A degraded result (one backend
//! failed) is published but not stored, and neither is a result whose fetch
//! overlapped an invalidation, since it may predate the mutation.

use std::sync::Arc;

use reel_core::{AppConfig, CacheStats, Query, ResultCache, SearchHit};
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;

use crate::BackendError;
use crate::index::{IndexClient, IndexConfig};
use crate::merge::merge_hits;
use crate::metadata::{MetadataClient, MetadataConfig};
use crate::source::{RatedTitleSource, UnratedTitleSource};

/// Where published hits came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Cache,
    Backend,
}

/// Result of one `search` call as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Hits were published for `query`.
    Hits {
        query: Query,
        hits: Vec<SearchHit>,
        source: HitSource,
        /// One backend failed and the hits come from the other only.
        degraded: bool,
    },
    /// The query was too short; results were reset to empty.
    Cleared,
    /// A newer search or `cancel()` replaced this one. Nothing was published.
    Superseded,
}

impl SearchOutcome {
    /// Published hits, empty for cleared and superseded searches.
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Hits { hits, .. } => hits,
            _ => &[],
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Search failures that reach the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("both search backends failed for {query:?}: index: {primary}; metadata: {secondary}")]
    BothBackendsFailed { query: String, primary: BackendError, secondary: BackendError },
}

/// Latest result set published to subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Published {
    /// `None` after a clear.
    pub query: Option<Query>,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    query: Query,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct State {
    current: Option<Query>,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    /// Bumped on every invalidation or clear.
    generation: u64,
    cache: ResultCache,
}

impl State {
    /// Cancel the in-flight request, if any. Safe to call repeatedly.
    fn supersede(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(query = %previous.query, request = previous.id, "superseding in-flight search");
            previous.cancel.cancel();
        }
    }
}

/// Façade between a search box and the two title backends.
///
/// Construct one per user session and share it behind an `Arc`.
pub struct SearchOrchestrator {
    rated: Arc<dyn RatedTitleSource>,
    unrated: Arc<dyn UnratedTitleSource>,
    state: Mutex<State>,
    published: watch::Sender<Published>,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator").finish_non_exhaustive()
    }
}

impl SearchOrchestrator {
    pub fn new(
        rated: Arc<dyn RatedTitleSource>, unrated: Arc<dyn UnratedTitleSource>, cache_budget: usize,
    ) -> Self {
        let (published, _) = watch::channel(Published::default());
        Self {
            rated,
            unrated,
            state: Mutex::new(State {
                current: None,
                in_flight: None,
                next_request_id: 0,
                generation: 0,
                cache: ResultCache::new(cache_budget),
            }),
            published,
        }
    }

    /// Build the HTTP backends from application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        let index = IndexClient::new(IndexConfig::from_app_config(config)?)?;
        let metadata = MetadataClient::new(MetadataConfig::from_app_config(config)?)?;
        Ok(Self::new(Arc::new(index), Arc::new(metadata), config.cache_budget))
    }

    /// Receive every result set this orchestrator publishes.
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.published.subscribe()
    }

    /// Search for `raw`, superseding any search still in flight.
    ///
    /// Cancellation and supersession are reported as
    /// [`SearchOutcome::Superseded`], never as errors.
    pub async fn search(&self, raw: &str) -> Result<SearchOutcome, SearchError> {
        let query = Query::new(raw);

        let (request_id, cancel, generation) = {
            let mut state = self.state.lock().await;
            state.supersede();

            if !query.is_searchable() {
                state.current = None;
                self.published.send_replace(Published::default());
                tracing::debug!(query = %query, "query too short, cleared results");
                return Ok(SearchOutcome::Cleared);
            }

            state.current = Some(query.clone());

            if let Some(cached) = state.cache.get(&query) {
                let hits = cached.to_vec();
                tracing::debug!(query = %query, hits = hits.len(), "serving search from cache");
                self.publish(&query, &hits);
                return Ok(SearchOutcome::Hits { query, hits, source: HitSource::Cache, degraded: false });
            }

            let id = state.next_request_id;
            state.next_request_id += 1;
            let cancel = CancellationToken::new();
            state.in_flight = Some(InFlight { id, query: query.clone(), cancel: cancel.clone() });
            (id, cancel, state.generation)
        };

        tracing::debug!(query = %query, request = request_id, "fetching from backends");

        let (rated, unrated) =
            tokio::join!(self.rated.search(query.as_str(), &cancel), self.unrated.search(query.as_str()));

        let mut state = self.state.lock().await;
        if state.in_flight.as_ref().is_some_and(|f| f.id == request_id) {
            state.in_flight = None;
        }

        let superseded = cancel.is_cancelled()
            || state.current.as_ref() != Some(&query)
            || rated.as_ref().is_err_and(BackendError::is_cancelled);
        if superseded {
            tracing::debug!(query = %query, request = request_id, "discarding superseded search");
            return Ok(SearchOutcome::Superseded);
        }

        let (hits, degraded) = match (rated, unrated) {
            (Ok(rated), Ok(unrated)) => (merge_hits(rated, unrated), false),
            (Err(primary), Ok(unrated)) => {
                tracing::warn!(query = %query, error = %primary, "index search failed, using metadata results only");
                (merge_hits(Vec::new(), unrated), true)
            }
            (Ok(rated), Err(secondary)) => {
                tracing::warn!(query = %query, error = %secondary, "metadata search failed, using index results only");
                (merge_hits(rated, Vec::new()), true)
            }
            (Err(primary), Err(secondary)) => {
                tracing::error!(
                    query = %query,
                    index_error = %primary,
                    metadata_error = %secondary,
                    "both search backends failed"
                );
                self.publish(&query, &[]);
                return Err(SearchError::BothBackendsFailed { query: query.into_string(), primary, secondary });
            }
        };

        self.publish(&query, &hits);
        if degraded {
            tracing::debug!(query = %query, "degraded result not cached");
        } else if state.generation != generation {
            tracing::debug!(query = %query, request = request_id, "cache invalidated during fetch, result not cached");
        } else {
            state.cache.put(query.clone(), hits.clone());
        }

        tracing::debug!(query = %query, hits = hits.len(), degraded, "search settled");
        Ok(SearchOutcome::Hits { query, hits, source: HitSource::Backend, degraded })
    }

    /// Abort the in-flight search and forget the current query.
    ///
    /// Idempotent: cancelling with nothing in flight is a no-op.
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        state.supersede();
        state.current = None;
    }

    /// Drop cached searches that mention `identifier`. Returns the number removed.
    ///
    /// Searches already in flight still publish but skip the cache write.
    pub async fn invalidate(&self, identifier: &str) -> usize {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.cache.invalidate(identifier)
    }

    pub async fn clear_cache(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.cache.clear();
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.state.lock().await.cache.stats()
    }

    /// Query of the search that results are currently being produced for.
    pub async fn current_query(&self) -> Option<Query> {
        self.state.lock().await.current.clone()
    }

    pub async fn is_cached(&self, query: &str) -> bool {
        self.state.lock().await.cache.contains(&Query::new(query))
    }

    fn publish(&self, query: &Query, hits: &[SearchHit]) {
        self.published.send_replace(Published { query: Some(query.clone()), hits: hits.to_vec() });
    }
}
