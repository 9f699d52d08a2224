//! Free-text to results: extracting structured results from model prose.
//!
//! Generative providers are asked to answer with a JSON object, but models
//! drift. This module first tries to pull a JSON `results` array out of the
//! raw text; if that fails it falls back to a documented heuristic: split
//! the prose into paragraph blocks and manufacture one result per block
//! with descending synthetic scores.

use crate::normalize;
use crate::types::{ProviderKind, SearchResult};

/// Score assigned to the first paragraph-fallback block.
const FALLBACK_START_SCORE: f64 = 0.9;

/// Score step between consecutive fallback blocks.
const FALLBACK_SCORE_STEP: f64 = 0.1;

/// Maximum number of results manufactured from paragraph splitting.
const MAX_FALLBACK_BLOCKS: usize = 5;

/// Minimum length for a paragraph block to count as a result.
const MIN_BLOCK_LEN: usize = 50;

/// Convert raw model output into canonical results.
///
/// Tries JSON extraction first, then paragraph splitting. Never fails and
/// never returns results with out-of-range scores. `min_score` is the
/// floor for the descending fallback scores (providers choose 0.3–0.5).
pub fn text_to_results(
    raw: &str,
    query: &str,
    kind: ProviderKind,
    default_score: f64,
    min_score: f64,
) -> Vec<SearchResult> {
    if let Some(results) = extract_json_results(raw, kind, default_score) {
        tracing::debug!(provider = %kind, count = results.len(), "parsed structured model output");
        return results;
    }
    tracing::debug!(provider = %kind, "no structured output found, splitting paragraphs");
    split_into_results(raw, query, kind, min_score)
}

/// Attempt to parse a JSON object embedded in model text.
///
/// Takes the outermost `{ ... }` span, which tolerates prose before and
/// after the object. Returns `None` when no well-formed `results` array
/// can be recovered.
fn extract_json_results(
    raw: &str,
    kind: ProviderKind,
    default_score: f64,
) -> Option<Vec<SearchResult>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(&raw[start..=end]).ok()?;
    let records = value.get("results")?.as_array()?;
    if records.is_empty() {
        return None;
    }
    Some(
        records
            .iter()
            .map(|record| normalize::from_generative_record(record, kind, default_score))
            .collect(),
    )
}

/// Manufacture results from plain prose, one per coherent text block.
fn split_into_results(
    raw: &str,
    query: &str,
    kind: ProviderKind,
    min_score: f64,
) -> Vec<SearchResult> {
    let blocks: Vec<&str> = raw
        .split("\n\n")
        .map(str::trim)
        .filter(|block| block.chars().count() > MIN_BLOCK_LEN)
        .collect();

    if blocks.is_empty() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        // Nothing block-shaped: one result from the whole response.
        return vec![SearchResult {
            title: format!("AI Analysis: {query}"),
            snippet: normalize::truncate_snippet(Some(trimmed)),
            url: None,
            relevance_score: normalize::clamp_score(0.8),
            source: kind.name().to_owned(),
            organization: None,
            last_updated: None,
        }];
    }

    blocks
        .iter()
        .take(MAX_FALLBACK_BLOCKS)
        .enumerate()
        .map(|(index, block)| {
            let (title, body) = split_title(block, query, index);
            SearchResult {
                title,
                snippet: normalize::truncate_snippet(Some(&body)),
                url: None,
                relevance_score: normalize::rank_decay(
                    FALLBACK_START_SCORE,
                    FALLBACK_SCORE_STEP,
                    min_score,
                    index,
                ),
                source: kind.name().to_owned(),
                organization: None,
                last_updated: None,
            }
        })
        .collect()
}

/// Derive a title and body from one prose block.
///
/// A short first line that does not read like a sentence (no trailing
/// period) is treated as a heading; otherwise a positional title is
/// synthesized and the whole block becomes the body.
fn split_title(block: &str, query: &str, index: usize) -> (String, String) {
    let mut lines = block.lines();
    let first = lines.next().unwrap_or_default().trim();
    let rest: String = lines.collect::<Vec<_>>().join(" ").trim().to_owned();

    if !rest.is_empty() && first.chars().count() < 100 && !first.ends_with('.') {
        let title = first
            .trim_start_matches(|c: char| {
                c.is_ascii_digit() || matches!(c, '#' | '-' | '*' | '.' | ')' | ' ')
            })
            .trim()
            .to_owned();
        if !title.is_empty() {
            return (title, rest);
        }
    }
    (format!("{} - Insight {}", query, index + 1), block.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED: &str = r#"Here is what I found:
{
  "results": [
    {"title": "Climate Portals", "snippet": "National climate data portals.", "url": "https://example.gov", "relevance_score": 0.95, "source": "Gov Index"},
    {"title": "Ocean Data", "snippet": "Buoy and satellite observations.", "relevance_score": 0.85}
  ]
}
Hope that helps!"#;

    #[test]
    fn structured_output_parses_all_records() {
        let results = text_to_results(STRUCTURED, "climate", ProviderKind::Grok, 0.8, 0.5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Climate Portals");
        assert_eq!(results[0].url.as_deref(), Some("https://example.gov"));
        assert_eq!(results[1].source, "Grok AI");
    }

    #[test]
    fn malformed_json_falls_back_to_paragraphs() {
        let raw = "{\"results\": [ broken json\n\nClimate observation networks collect long-running temperature series across thousands of stations worldwide.";
        let results = text_to_results(raw, "climate", ProviderKind::Grok, 0.8, 0.5);
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.relevance_score)));
    }

    #[test]
    fn json_without_results_array_falls_back() {
        let raw = "{\"answer\": \"this model ignored the format and wrote a long explanation about datasets instead of returning results\"}";
        let results = text_to_results(raw, "datasets", ProviderKind::Ollama, 0.5, 0.3);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn paragraph_fallback_scores_descend_to_floor() {
        let block = "word ".repeat(20);
        let raw = (0..8).map(|_| block.clone()).collect::<Vec<_>>().join("\n\n");
        let results = text_to_results(&raw, "ai", ProviderKind::Grok, 0.8, 0.5);
        assert_eq!(results.len(), 5);
        assert!((results[0].relevance_score - 0.9).abs() < f64::EPSILON);
        assert!((results[1].relevance_score - 0.8).abs() < f64::EPSILON);
        for pair in results.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        assert!(results.last().map_or(false, |r| r.relevance_score >= 0.5));
    }

    #[test]
    fn heading_line_becomes_title() {
        let raw = "1. Remote Sensing Archives\nSatellite archives hold decades of imagery suitable for land-use and climate studies across every continent.";
        let results = text_to_results(raw, "imagery", ProviderKind::Ollama, 0.5, 0.3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Remote Sensing Archives");
        assert!(results[0].snippet.starts_with("Satellite archives"));
    }

    #[test]
    fn sentence_first_line_gets_positional_title() {
        let raw = "This block opens with a full sentence that ends in a period.\nAnd continues with more detail about the subject at hand for good measure.";
        let results = text_to_results(raw, "subject", ProviderKind::Grok, 0.8, 0.5);
        assert_eq!(results[0].title, "subject - Insight 1");
    }

    #[test]
    fn short_unstructured_text_yields_single_analysis_result() {
        let raw = "Brief answer.";
        let results = text_to_results(raw, "brief", ProviderKind::Grok, 0.8, 0.5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "AI Analysis: brief");
        assert!((results[0].relevance_score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let results = text_to_results("   \n  ", "q", ProviderKind::Ollama, 0.5, 0.3);
        assert!(results.is_empty());
    }

    #[test]
    fn fallback_is_deterministic() {
        let raw = "A sufficiently long paragraph about statistical agencies and the records they publish every year.";
        let a = text_to_results(raw, "statistics", ProviderKind::Grok, 0.8, 0.5);
        let b = text_to_results(raw, "statistics", ProviderKind::Grok, 0.8, 0.5);
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].title, b[0].title);
        assert!((a[0].relevance_score - b[0].relevance_score).abs() < f64::EPSILON);
    }
}
