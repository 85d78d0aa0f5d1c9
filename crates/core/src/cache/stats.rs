//! Cache counters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Running counters for a [`ResultCache`](super::ResultCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    /// `put` calls ignored because the query was already cached.
    pub rejected_duplicates: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub entries: usize,
    pub total_cost: usize,
    pub cost_budget: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}
