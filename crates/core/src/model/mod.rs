//! Data model for title search.

mod hit;
mod query;

pub use hit::{MediaType, RatedTitle, SearchHit, UnratedTitle};
pub use query::{MIN_QUERY_CHARS, Query};
