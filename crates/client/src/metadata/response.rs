//! Metadata API response types and normalization.

use reel_core::{MediaType, UnratedTitle};
use serde::Deserialize;

use crate::normalize::parse_release_date;

/// Raw response from the multi-search endpoint.
#[derive(Debug, Deserialize)]
pub struct MetadataApiResponse {
    #[serde(default)]
    pub results: Vec<MetadataResult>,
}

/// Individual multi-search entry. Movies carry `title`/`release_date`,
/// series carry `name`/`first_air_date`, people carry neither.
#[derive(Debug, Deserialize)]
pub struct MetadataResult {
    pub id: u64,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl MetadataResult {
    /// Normalize into an unrated title, or `None` for unsupported media types.
    pub fn into_title(self) -> Option<UnratedTitle> {
        let media_type = MediaType::parse(&self.media_type)?;
        let (title, date) = match media_type {
            MediaType::Movie => (self.title.or(self.name), self.release_date),
            MediaType::Tv => (self.name.or(self.title), self.first_air_date),
        };

        Some(UnratedTitle {
            external_id: self.id,
            title: title?,
            release_date: parse_release_date(date.as_deref()),
            media_type,
        })
    }
}

impl MetadataApiResponse {
    pub fn into_titles(self) -> Vec<UnratedTitle> {
        self.results.into_iter().filter_map(MetadataResult::into_title).collect()
    }
}
