//! Search index response types and normalization.

use reel_core::{MediaType, RatedTitle};
use serde::Deserialize;

use crate::normalize::{lenient_id, parse_release_date};

/// Raw response from the index query endpoint.
#[derive(Debug, Deserialize)]
pub struct IndexApiResponse {
    #[serde(default)]
    pub hits: Vec<IndexHit>,
}

/// Individual record stored in the rated-titles index.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexHit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    pub media_type: String,
    #[serde(default, alias = "externalId", deserialize_with = "lenient_id")]
    pub tmdb_id: Option<u64>,
}

impl IndexApiResponse {
    /// Normalize into rated titles, preserving index order and dropping
    /// records with unsupported media types.
    pub fn into_titles(self) -> Vec<RatedTitle> {
        self.hits
            .into_iter()
            .filter_map(|hit| {
                let Some(media_type) = MediaType::parse(&hit.media_type) else {
                    tracing::debug!(id = %hit.object_id, media_type = %hit.media_type, "skipping index record");
                    return None;
                };
                Some(RatedTitle {
                    id: hit.object_id,
                    external_id: hit.tmdb_id,
                    title: hit.title,
                    release_date: parse_release_date(hit.release_date.as_deref()),
                    media_type,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FIXTURE_JSON: &str = r#"{
        "hits": [
            {
                "objectID": "tt1",
                "title": "Batman",
                "releaseDate": "1989-06-23",
                "mediaType": "movie",
                "tmdbId": 268,
                "_highlightResult": {}
            },
            {
                "objectID": "tt2",
                "title": "Batman: The Animated Series",
                "releaseDate": "",
                "mediaType": "tv",
                "tmdbId": "2098"
            },
            {
                "objectID": "tt3",
                "title": "Batman Behind the Scenes",
                "mediaType": "short"
            }
        ],
        "nbHits": 3
    }"#;

    #[test]
    fn test_normalize_hits() {
        let raw: IndexApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let titles = raw.into_titles();

        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].id, "tt1");
        assert_eq!(titles[0].external_id, Some(268));
        assert_eq!(titles[0].release_date, NaiveDate::from_ymd_opt(1989, 6, 23));
        assert_eq!(titles[0].media_type, MediaType::Movie);

        assert_eq!(titles[1].id, "tt2");
        assert_eq!(titles[1].external_id, Some(2098));
        assert_eq!(titles[1].release_date, None);
        assert_eq!(titles[1].media_type, MediaType::Tv);
    }

    #[test]
    fn test_empty_hits() {
        let raw: IndexApiResponse = serde_json::from_str(r#"{"hits": []}"#).unwrap();
        assert!(raw.into_titles().is_empty());

        let raw: IndexApiResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.into_titles().is_empty());
    }

    #[test]
    fn test_missing_external_id() {
        let json = r#"{"hits": [{"objectID": "tt9", "title": "Local Only", "mediaType": "movie"}]}"#;
        let titles = serde_json::from_str::<IndexApiResponse>(json).unwrap().into_titles();
        assert_eq!(titles[0].external_id, None);
    }
}
