//! Search hit types shared by the backends, the cache and the outer surfaces.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Media types the search surfaces. Anything else the metadata backend
/// returns (people, collections) is dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Parse a backend media type tag, returning `None` for unsupported kinds.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A title the user base has already reviewed, sourced from the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RatedTitle {
    /// Stable internal identifier.
    pub id: String,
    /// Metadata backend id, when the curated record knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<u64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    pub media_type: MediaType,
}

/// A title nobody has reviewed yet, sourced from the metadata backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UnratedTitle {
    pub external_id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    pub media_type: MediaType,
}

/// One entry of a merged result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit {
    Rated(RatedTitle),
    Unrated(UnratedTitle),
}

impl SearchHit {
    pub fn title(&self) -> &str {
        match self {
            Self::Rated(t) => &t.title,
            Self::Unrated(t) => &t.title,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Rated(t) => t.media_type,
            Self::Unrated(t) => t.media_type,
        }
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Rated(t) => t.release_date,
            Self::Unrated(t) => t.release_date,
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self, Self::Rated(_))
    }

    /// Metadata backend id, known for every unrated hit and for rated hits
    /// that were linked when curated.
    pub fn external_id(&self) -> Option<u64> {
        match self {
            Self::Rated(t) => t.external_id,
            Self::Unrated(t) => Some(t.external_id),
        }
    }

    /// Whether an invalidation for `identifier` concerns this hit.
    ///
    /// Matches the internal id of rated hits and the metadata id of either kind.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        if let Self::Rated(t) = self
            && t.id == identifier
        {
            return true;
        }
        match (self.external_id(), identifier.parse::<u64>()) {
            (Some(ext), Ok(wanted)) => ext == wanted,
            _ => false,
        }
    }
}

impl From<RatedTitle> for SearchHit {
    fn from(t: RatedTitle) -> Self {
        Self::Rated(t)
    }
}

impl From<UnratedTitle> for SearchHit {
    fn from(t: UnratedTitle) -> Self {
        Self::Unrated(t)
    }
}
