//! Core types for search queries, results, and response envelopes.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated free-text search query.
///
/// Construction enforces the boundary contract: text between 1 and 500
/// characters from a constrained character set, limit between 1 and 50.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    limit: usize,
}

impl SearchQuery {
    /// Maximum query text length in characters.
    pub const MAX_TEXT_LEN: usize = 500;
    /// Maximum number of results a caller may request.
    pub const MAX_LIMIT: usize = 50;
    /// Result count used when the caller does not specify one.
    pub const DEFAULT_LIMIT: usize = 10;

    /// Build a query, validating text and limit.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] when the text is empty, too long,
    /// contains characters outside `[A-Za-z0-9 space - _ . ! ?]`, or the
    /// limit is outside `1..=50`.
    pub fn new(text: impl Into<String>, limit: usize) -> Result<Self, SearchError> {
        let text = text.into();
        if text.is_empty() {
            return Err(SearchError::Config("search query cannot be empty".into()));
        }
        if text.chars().count() > Self::MAX_TEXT_LEN {
            return Err(SearchError::Config("search query too long".into()));
        }
        let valid = text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || " -_.!?".contains(c));
        if !valid {
            return Err(SearchError::Config(
                "invalid characters in search query".into(),
            ));
        }
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(SearchError::Config(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self { text, limit })
    }

    /// Build a query with the default result limit.
    ///
    /// # Errors
    ///
    /// Same as [`SearchQuery::new`].
    pub fn with_default_limit(text: impl Into<String>) -> Result<Self, SearchError> {
        Self::new(text, Self::DEFAULT_LIMIT)
    }

    /// The query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The requested result count.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One canonical search result.
///
/// Produced only by the result normalizer or the fallback synthesizer and
/// never mutated afterwards: ranking reorders results, it does not edit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title. Never empty; a placeholder is substituted when the
    /// upstream record omits it.
    pub title: String,
    /// Short description. Never empty; placeholder substituted when missing.
    pub snippet: String,
    /// Link to the underlying resource, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Ordering score in `[0, 1]`. Not a calibrated probability.
    pub relevance_score: f64,
    /// Display label of the provider (or synthesizer) that produced this result.
    pub source: String,
    /// Publishing organization, when the upstream record carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Upstream last-modified timestamp, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// The unified response for one aggregation call.
///
/// `total_results` always equals `results.len()` after truncation, never
/// the pre-truncation count. Request-scoped; constructed once and returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Results in rank order, at most `limit` entries.
    pub results: Vec<SearchResult>,
    /// Human-readable one-sentence summary. Non-empty; no other contract.
    pub summary: String,
    /// Echo of the query text.
    pub query: String,
    /// Number of results in this response.
    pub total_results: usize,
    /// Wall-clock aggregation time in milliseconds.
    pub processing_time_ms: u64,
}

/// The upstream providers GhostQuery can aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// US government open-data catalog (CKAN API).
    DataGov,
    /// EU Open Data Portal dataset search.
    EuPortal,
    /// Local Ollama instance (generative, no credentials required).
    Ollama,
    /// Grok chat-completions API (generative, credential-gated).
    Grok,
    /// Hugging Face inference API (generative, credential-gated,
    /// embedding-driven).
    HuggingFace,
}

impl ProviderKind {
    /// Human-readable display name, used as the `source` label on results.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DataGov => "Data.gov (USA)",
            Self::EuPortal => "EU Open Data Portal",
            Self::Ollama => "Ollama AI",
            Self::Grok => "Grok AI",
            Self::HuggingFace => "Hugging Face AI",
        }
    }

    /// Fixed share of the requested limit this provider is asked for when
    /// aggregated alongside its peers. Catalog aggregation splits 70/30;
    /// generative providers run alone and take the full limit.
    pub fn share_weight(&self) -> f64 {
        match self {
            Self::DataGov => 0.7,
            Self::EuPortal => 0.3,
            Self::Ollama | Self::Grok | Self::HuggingFace => 1.0,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
