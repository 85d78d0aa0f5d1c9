//! Query to hit-list cache with cost-bounded LRU eviction.

use lru::LruCache;

use super::stats::CacheStats;
use crate::model::{Query, SearchHit};

/// Default cost budget (total number of cached hits).
pub const DEFAULT_COST_BUDGET: usize = 500;

/// A cached result list with its eviction cost.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    hits: Vec<SearchHit>,
    cost: usize,
}

impl CacheEntry {
    fn new(hits: Vec<SearchHit>) -> Self {
        // Empty results still occupy a slot, so they must still count.
        let cost = hits.len().max(1);
        Self { hits, cost }
    }
}

/// Bounded, first-write-wins cache from query to merged hits.
///
/// Not internally synchronized: the owning orchestrator serializes access.
#[derive(Debug)]
pub struct ResultCache {
    entries: LruCache<Query, CacheEntry>,
    total_cost: usize,
    cost_budget: usize,
    stats: CacheStats,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_COST_BUDGET)
    }
}

impl ResultCache {
    /// Create a cache bounded by `cost_budget` hits. A zero budget is raised to one.
    pub fn new(cost_budget: usize) -> Self {
        let cost_budget = cost_budget.max(1);
        Self {
            entries: LruCache::unbounded(),
            total_cost: 0,
            cost_budget,
            stats: CacheStats { cost_budget, ..Default::default() },
        }
    }

    /// Look up the hits cached for `query`, marking the entry as recently used.
    pub fn get(&mut self, query: &Query) -> Option<&[SearchHit]> {
        if self.entries.contains(query) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        self.entries.get(query).map(|entry| entry.hits.as_slice())
    }

    /// Whether `query` is cached, without touching recency or counters.
    pub fn contains(&self, query: &Query) -> bool {
        self.entries.contains(query)
    }

    /// Insert `hits` for `query` unless an entry already exists.
    ///
    /// Returns `true` when the entry was stored. Evicts least-recently-used
    /// entries until the total cost fits the budget again.
    pub fn put(&mut self, query: Query, hits: Vec<SearchHit>) -> bool {
        if self.entries.contains(&query) {
            self.stats.rejected_duplicates += 1;
            tracing::debug!(query = %query, "cache entry already present, keeping first write");
            return false;
        }

        let entry = CacheEntry::new(hits);
        if entry.cost > self.cost_budget {
            tracing::debug!(
                query = %query,
                cost = entry.cost,
                budget = self.cost_budget,
                "result set larger than cache budget, not cached"
            );
            return false;
        }

        self.total_cost += entry.cost;
        self.entries.put(query, entry);
        self.stats.inserts += 1;

        while self.total_cost > self.cost_budget {
            match self.entries.pop_lru() {
                Some((evicted, entry)) => {
                    self.total_cost -= entry.cost;
                    self.stats.evictions += 1;
                    tracing::trace!(query = %evicted, cost = entry.cost, "evicted cache entry");
                }
                None => break,
            }
        }

        true
    }

    /// Drop every entry containing a hit that matches `identifier`.
    ///
    /// Called by mutation flows when a title is newly rated or removed.
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, identifier: &str) -> usize {
        let stale: Vec<Query> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.hits.iter().any(|hit| hit.matches_identifier(identifier)))
            .map(|(query, _)| query.clone())
            .collect();

        for query in &stale {
            if let Some(entry) = self.entries.pop(query) {
                self.total_cost -= entry.cost;
            }
        }

        self.stats.invalidations += stale.len() as u64;
        if !stale.is_empty() {
            tracing::debug!(identifier, removed = stale.len(), "invalidated cached searches");
        }
        stale.len()
    }

    /// Remove every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_cost = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    /// Snapshot of the counters together with current occupancy.
    pub fn stats(&self) -> CacheStats {
        CacheStats { entries: self.entries.len(), total_cost: self.total_cost, ..self.stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaType, RatedTitle, UnratedTitle};

    fn rated(id: &str) -> SearchHit {
        SearchHit::Rated(RatedTitle {
            id: id.to_string(),
            external_id: None,
            title: format!("Title {id}"),
            release_date: None,
            media_type: MediaType::Movie,
        })
    }

    fn unrated(id: u64) -> SearchHit {
        SearchHit::Unrated(UnratedTitle {
            external_id: id,
            title: format!("Title {id}"),
            release_date: None,
            media_type: MediaType::Tv,
        })
    }

    fn hits(n: usize) -> Vec<SearchHit> {
        (0..n).map(|i| rated(&format!("r{i}"))).collect()
    }

    #[test]
    fn test_get_missing() {
        let mut cache = ResultCache::default();
        assert!(cache.get(&Query::new("batman")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = ResultCache::default();
        assert!(cache.put(Query::new("batman"), vec![rated("tt1")]));

        let cached = cache.get(&Query::new(" batman ")).unwrap();
        assert_eq!(cached, &[rated("tt1")]);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_first_write_wins() {
        let mut cache = ResultCache::default();
        let q = Query::new("batman");
        assert!(cache.put(q.clone(), vec![rated("tt1")]));
        assert!(!cache.put(q.clone(), vec![rated("tt2"), unrated(268)]));

        assert_eq!(cache.get(&q).unwrap(), &[rated("tt1")]);
        assert_eq!(cache.stats().rejected_duplicates, 1);
        assert_eq!(cache.total_cost(), 1);
    }

    #[test]
    fn test_empty_results_are_cached() {
        let mut cache = ResultCache::default();
        let q = Query::new("xyz123");
        assert!(cache.put(q.clone(), Vec::new()));
        assert_eq!(cache.get(&q).unwrap().len(), 0);
        assert_eq!(cache.total_cost(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = ResultCache::new(5);
        cache.put(Query::new("aa"), hits(2));
        cache.put(Query::new("bb"), hits(2));

        // Touch "aa" so "bb" becomes the eviction candidate.
        assert!(cache.get(&Query::new("aa")).is_some());
        cache.put(Query::new("cc"), hits(2));

        assert!(cache.contains(&Query::new("aa")));
        assert!(!cache.contains(&Query::new("bb")));
        assert!(cache.contains(&Query::new("cc")));
        assert_eq!(cache.total_cost(), 4);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_eviction_frees_enough_cost() {
        let mut cache = ResultCache::new(6);
        cache.put(Query::new("aa"), hits(1));
        cache.put(Query::new("bb"), hits(1));
        cache.put(Query::new("cc"), hits(3));
        cache.put(Query::new("dd"), hits(3));

        assert!(cache.total_cost() <= 6);
        assert!(cache.contains(&Query::new("dd")));
        assert!(!cache.contains(&Query::new("aa")));
    }

    #[test]
    fn test_oversized_entry_not_cached() {
        let mut cache = ResultCache::new(3);
        cache.put(Query::new("aa"), hits(1));
        assert!(!cache.put(Query::new("bb"), hits(4)));
        assert!(cache.contains(&Query::new("aa")));
        assert!(!cache.contains(&Query::new("bb")));
    }

    #[test]
    fn test_invalidate_by_rated_and_external_id() {
        let mut cache = ResultCache::default();
        cache.put(Query::new("bat"), vec![rated("tt1"), unrated(268)]);
        cache.put(Query::new("batman"), vec![rated("tt1")]);
        cache.put(Query::new("super"), vec![unrated(1924)]);

        assert_eq!(cache.invalidate("268"), 1);
        assert!(!cache.contains(&Query::new("bat")));
        assert!(cache.contains(&Query::new("batman")));

        assert_eq!(cache.invalidate("tt1"), 1);
        assert_eq!(cache.invalidate("tt1"), 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_cost(), 1);
        assert_eq!(cache.stats().invalidations, 2);
    }

    #[test]
    fn test_clear() {
        let mut cache = ResultCache::default();
        cache.put(Query::new("aa"), hits(3));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_cost(), 0);
        assert_eq!(cache.stats().inserts, 1);
    }

    #[test]
    fn test_zero_budget_is_raised() {
        let cache = ResultCache::new(0);
        assert_eq!(cache.stats().cost_budget, 1);
    }
}
