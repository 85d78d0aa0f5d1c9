//! Merge of rated and unrated hits into one result list.

use std::collections::HashSet;

use reel_core::{RatedTitle, SearchHit, UnratedTitle};

/// Rated hits first, in index order, then every unrated hit whose metadata
/// id is not already linked from a rated hit.
///
/// Deduplication is by id only. A rated title without a linked metadata id
/// and an unrated title with the same name both appear.
pub fn merge_hits(rated: Vec<RatedTitle>, unrated: Vec<UnratedTitle>) -> Vec<SearchHit> {
    let linked: HashSet<u64> = rated.iter().filter_map(|t| t.external_id).collect();

    let mut merged = Vec::with_capacity(rated.len() + unrated.len());
    merged.extend(rated.into_iter().map(SearchHit::Rated));
    merged.extend(
        unrated
            .into_iter()
            .filter(|t| !linked.contains(&t.external_id))
            .map(SearchHit::Unrated),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::MediaType;

    fn rated(id: &str, title: &str, external_id: Option<u64>) -> RatedTitle {
        RatedTitle {
            id: id.to_string(),
            external_id,
            title: title.to_string(),
            release_date: None,
            media_type: MediaType::Movie,
        }
    }

    fn unrated(external_id: u64, title: &str) -> UnratedTitle {
        UnratedTitle { external_id, title: title.to_string(), release_date: None, media_type: MediaType::Movie }
    }

    #[test]
    fn test_rated_first_in_backend_order() {
        let merged = merge_hits(
            vec![rated("b", "Batman Returns", None), rated("a", "Batman", None)],
            vec![unrated(1, "Batman Begins")],
        );
        let titles: Vec<&str> = merged.iter().map(|h| h.title()).collect();
        assert_eq!(titles, vec!["Batman Returns", "Batman", "Batman Begins"]);
        assert!(merged[0].is_rated());
        assert!(!merged[2].is_rated());
    }

    #[test]
    fn test_linked_unrated_hit_dropped() {
        let merged = merge_hits(vec![rated("tt1", "Batman", Some(268))], vec![unrated(268, "Batman")]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_rated());
    }

    #[test]
    fn test_unlinked_same_title_both_kept() {
        let merged = merge_hits(vec![rated("tt1", "Batman", None)], vec![unrated(268, "Batman")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_secondary_only() {
        let merged = merge_hits(Vec::new(), vec![unrated(268, "Batman"), unrated(364, "Batman Returns")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_both_empty() {
        assert!(merge_hits(Vec::new(), Vec::new()).is_empty());
    }
}
