//! Field normalization shared by the backend response parsers.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Parse a `YYYY-MM-DD` release date. Backends send `""` or omit the field
/// for unreleased titles; both become `None`.
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Accept a numeric id sent either as a JSON number or a numeric string.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Str(String),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Num(n)) => Some(n),
        Some(Repr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}
