//! Plain-text rendering of published results.

use std::fmt::Write;

use reel_client::Published;
use reel_core::SearchHit;

/// Render one published result set, one hit per line.
pub fn render(published: &Published) -> String {
    let Some(query) = &published.query else {
        return "(cleared)\n".to_string();
    };

    let mut out = format!("== {query} ({} hits)\n", published.hits.len());
    for hit in &published.hits {
        let _ = writeln!(out, "{}", hit_line(hit));
    }
    out
}

fn hit_line(hit: &SearchHit) -> String {
    let marker = if hit.is_rated() { '*' } else { ' ' };
    let year = hit
        .release_date()
        .map(|d| d.format(" (%Y)").to_string())
        .unwrap_or_default();
    format!("{marker} {}{year} [{}]", hit.title(), hit.media_type().as_str())
}
