//! Normalized search query.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Queries at or below this many characters clear the results instead of searching.
pub const MIN_QUERY_CHARS: usize = 2;

/// A trimmed, case-preserved search query.
///
/// Two queries are equal iff they are byte-identical after trimming, which
/// makes `Query` suitable as the result cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Query(String);

impl Query {
    /// Normalize raw input from the search box.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    /// Whether the query is long enough to hit the backends.
    ///
    /// Length is counted in characters, not bytes, so a two-letter query in
    /// a non-Latin script still searches.
    pub fn is_searchable(&self) -> bool {
        self.0.chars().count() >= MIN_QUERY_CHARS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
