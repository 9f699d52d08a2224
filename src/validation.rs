//! Request sanitization ahead of query construction.
//!
//! Raw request text is scrubbed of markup and script-injection patterns
//! before it ever reaches [`ghostquery_search::SearchQuery`], which then
//! enforces the strict character set. Sanitization trims and caps; it
//! never rejects on its own.

use ghostquery_search::{SearchError, SearchQuery};

/// Maximum characters kept after sanitization, matching the query limit.
const MAX_SANITIZED_LEN: usize = 500;

/// Strip markup and script-injection fragments from raw query text.
///
/// Removes `<` and `>`, `javascript:` scheme prefixes, and inline event
/// handler assignments (`onclick=` and friends), then trims and caps the
/// length. The output may still fail strict validation; this pass only
/// removes what should never be echoed back.
pub fn sanitize(raw: &str) -> String {
    let mut cleaned: String = raw.chars().filter(|c| *c != '<' && *c != '>').collect();

    // ASCII lowering keeps byte offsets aligned with the original text.
    // Re-scan after every removal: stripping can splice two fragments into
    // a fresh occurrence.
    while let Some(pos) = cleaned.to_ascii_lowercase().find("javascript:") {
        cleaned.replace_range(pos..pos + "javascript:".len(), "");
    }
    cleaned = strip_event_handlers(&cleaned);

    let trimmed = cleaned.trim();
    trimmed.chars().take(MAX_SANITIZED_LEN).collect()
}

/// Remove `on<word>=` sequences, the shape of inline HTML event handlers.
fn strip_event_handlers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let lowered = rest.to_ascii_lowercase();
        let Some(start) = lowered.find("on") else {
            out.push_str(rest);
            return out;
        };
        let tail = &rest[start + 2..];
        let word_len = tail.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        if word_len > 0 && tail[word_len..].starts_with('=') {
            out.push_str(&rest[..start]);
            rest = &tail[word_len + 1..];
        } else {
            out.push_str(&rest[..start + 2]);
            rest = tail;
        }
    }
}

/// Sanitize raw text and build a validated query.
///
/// # Errors
///
/// Returns [`SearchError::Config`] when the sanitized text or limit fails
/// validation. The message is safe to echo to the client.
pub fn validated_query(raw: &str, limit: Option<usize>) -> Result<SearchQuery, SearchError> {
    let cleaned = sanitize(raw);
    match limit {
        Some(limit) => SearchQuery::new(cleaned, limit),
        None => SearchQuery::with_default_limit(cleaned),
    }
}
