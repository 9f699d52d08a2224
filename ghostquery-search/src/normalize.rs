//! Result normalization: provider-native records to canonical [`SearchResult`]s.
//!
//! Pure functions only. Any field a provider omits degrades to a default
//! rather than failing the record, so a partially-populated upstream payload
//! never poisons a whole batch.

use crate::types::{ProviderKind, SearchResult};

/// Placeholder title for records that arrive without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Placeholder title for catalog datasets that arrive without one.
pub const DEFAULT_DATASET_TITLE: &str = "Untitled Dataset";

/// Placeholder snippet for records without a description.
pub const DEFAULT_SNIPPET: &str = "No description available";

/// Maximum snippet length in characters before truncation.
pub const MAX_SNIPPET_LEN: usize = 200;

/// Clamp a relevance score into `[0, 1]`.
///
/// Non-finite inputs collapse to 0.0 so a malformed upstream score can
/// never break ordering.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rank-based score decay: `max(start - step * index, floor)`.
///
/// Catalog providers do not report scores, so position in the upstream
/// ranking is the only relevance signal available.
pub fn rank_decay(start: f64, step: f64, floor: f64, index: usize) -> f64 {
    clamp_score((start - step * index as f64).max(floor))
}

/// Truncate a description to [`MAX_SNIPPET_LEN`] characters, appending an
/// ellipsis. Empty or missing input becomes [`DEFAULT_SNIPPET`].
pub fn truncate_snippet(text: Option<&str>) -> String {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return DEFAULT_SNIPPET.to_owned();
    }
    if text.chars().count() <= MAX_SNIPPET_LEN {
        return text.to_owned();
    }
    let truncated: String = text.chars().take(MAX_SNIPPET_LEN).collect();
    format!("{}...", truncated.trim_end())
}

/// Normalize one record from a generative provider's structured output.
///
/// Used on the entries of a JSON `results` array extracted from model
/// text. Every field tolerates absence or the wrong JSON type.
pub fn from_generative_record(
    record: &serde_json::Value,
    kind: ProviderKind,
    default_score: f64,
) -> SearchResult {
    let title = record
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_owned();
    let snippet = truncate_snippet(record.get("snippet").and_then(|v| v.as_str()));
    let url = record
        .get("url")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned);
    let relevance_score = record
        .get("relevance_score")
        .and_then(|v| v.as_f64())
        .map_or(clamp_score(default_score), clamp_score);
    let source = record
        .get("source")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(kind.name())
        .to_owned();

    SearchResult {
        title,
        snippet,
        url,
        relevance_score,
        source,
        organization: None,
        last_updated: None,
    }
}
