//! Search index request types.

use serde::Serialize;

/// Body of an index query request.
///
/// The index API takes its search parameters as a single URL-encoded string.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexQuery {
    pub params: String,
}

impl IndexQuery {
    pub fn new(query: &str, hits_per_page: u32) -> Self {
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("query", query)
            .append_pair("hitsPerPage", &hits_per_page.to_string())
            .finish();
        Self { params }
    }
}
