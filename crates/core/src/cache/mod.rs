//! In-memory result cache for title search.
//!
//! Maps a normalized [`Query`](crate::Query) to the merged hit list that was
//! published for it. Properties:
//!
//! - First write wins: a slower request for a query never replaces an entry a
//!   faster one already stored.
//! - Least-recently-used eviction bounded by a total cost budget, where an
//!   entry costs one unit per hit (minimum one).
//! - No time-based expiry. Entries are dropped by eviction or by explicit
//!   invalidation when a title changes between rated and unrated.

mod results;
mod stats;

pub use results::{DEFAULT_COST_BUDGET, ResultCache};
pub use stats::CacheStats;
