//! Concurrent fan-out, merge, and ranking across configured providers.
//!
//! The aggregator owns a fixed provider set and a mode. Every search fans
//! out to all providers at once, waits for every outcome to settle, merges
//! the successful result sets, and ranks by relevance score. Provider
//! failures are contained: they are logged and the remaining providers'
//! results still ship. If nothing survives, the synthesizer guarantees a
//! non-empty response.

use crate::config::{DataGovConfig, EuPortalConfig, GrokConfig, HuggingFaceConfig, OllamaConfig};
use crate::error::Result;
use crate::health::{self, HealthReport};
use crate::provider::Provider;
use crate::providers::{
    DataGovProvider, EuPortalProvider, GrokProvider, HuggingFaceProvider, OllamaProvider,
};
use crate::synth;
use crate::types::{SearchQuery, SearchResponse, SearchResult};
use std::cmp::Ordering;
use std::time::Instant;

/// Which flavor of aggregation a given instance serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Open-data catalog search across government portals.
    Catalog,
    /// Generative search through a single AI backend.
    Generative,
}

/// A fixed set of providers searched concurrently per query.
#[derive(Debug)]
pub struct Aggregator {
    providers: Vec<Provider>,
    mode: SearchMode,
}

impl Aggregator {
    /// Build an aggregator over an explicit provider set.
    pub fn new(providers: Vec<Provider>, mode: SearchMode) -> Self {
        Self { providers, mode }
    }

    /// The standard catalog aggregator: Data.gov plus the EU portal.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SearchError::Config`] when either provider
    /// configuration is invalid.
    pub fn catalog(datagov: DataGovConfig, eu_portal: EuPortalConfig) -> Result<Self> {
        Ok(Self::new(
            vec![
                Provider::DataGov(DataGovProvider::new(datagov)?),
                Provider::EuPortal(EuPortalProvider::new(eu_portal)?),
            ],
            SearchMode::Catalog,
        ))
    }

    /// A generative aggregator backed by a local Ollama instance.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SearchError::Config`] when the provider
    /// configuration is invalid.
    pub fn ollama(config: OllamaConfig) -> Result<Self> {
        Ok(Self::new(
            vec![Provider::Ollama(OllamaProvider::new(config)?)],
            SearchMode::Generative,
        ))
    }

    /// A generative aggregator backed by the Grok API, with offline
    /// synthesis when no key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SearchError::Config`] when the provider
    /// configuration is invalid.
    pub fn grok(config: GrokConfig) -> Result<Self> {
        Ok(Self::new(
            vec![Provider::Grok(GrokProvider::new(config)?)],
            SearchMode::Generative,
        ))
    }

    /// A generative aggregator backed by the Hugging Face inference API,
    /// with offline synthesis when no key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SearchError::Config`] when the provider
    /// configuration is invalid.
    pub fn huggingface(config: HuggingFaceConfig) -> Result<Self> {
        Ok(Self::new(
            vec![Provider::HuggingFace(HuggingFaceProvider::new(config)?)],
            SearchMode::Generative,
        ))
    }

    /// The configured providers, in fan-out order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Run one aggregated search. Infallible by design: provider failures
    /// degrade the response, they never abort it.
    pub async fn search(&self, query: &SearchQuery) -> SearchResponse {
        let started = Instant::now();
        let limit = query.limit();

        let calls = self.providers.iter().map(|provider| async move {
            let share = share_of_limit(limit, provider.share_weight());
            (provider.kind(), provider.fetch(query, share).await)
        });
        let outcomes = futures::future::join_all(calls).await;

        let mut merged: Vec<SearchResult> = Vec::new();
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    tracing::debug!(provider = %kind, count = results.len(), "provider settled");
                    merged.extend(results);
                }
                // Expected degraded state: the provider's share is served
                // from the synthesizer instead.
                Err(crate::error::SearchError::Unconfigured(reason)) => {
                    tracing::debug!(provider = %kind, reason, "provider unconfigured, synthesizing share");
                    let share = share_of_limit(limit, kind.share_weight());
                    merged.extend(synth::synthesize(query.text(), share));
                }
                Err(err) => {
                    tracing::warn!(provider = %kind, error = %err, "provider failed, continuing");
                }
            }
        }

        let degraded = merged.is_empty();
        if degraded {
            tracing::warn!(query = query.text(), "no live results, synthesizing");
            merged = synth::synthesize(query.text(), limit);
        }
        let results = merge_and_rank(merged, limit);
        let summary = build_summary(self.mode, degraded, query.text(), results.len());
        let total_results = results.len();

        SearchResponse {
            results,
            summary,
            query: query.text().to_owned(),
            total_results,
            processing_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Probe every configured provider concurrently.
    pub async fn health(&self) -> Vec<HealthReport> {
        health::probe_all(&self.providers).await
    }
}

/// A provider's slice of the overall limit, rounded up so that small
/// limits never starve the minority provider.
fn share_of_limit(limit: usize, weight: f64) -> usize {
    (limit as f64 * weight).ceil() as usize
}

/// Sort by descending relevance score and truncate to `limit`.
///
/// The sort is stable, so results with equal scores keep fan-out order:
/// the earlier-listed provider wins ties.
pub(crate) fn merge_and_rank(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(limit);
    results
}

fn build_summary(mode: SearchMode, degraded: bool, query: &str, count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    match (mode, degraded) {
        (SearchMode::Catalog, false) => format!(
            "Found {count} open data source{plural} for \"{query}\". Results include datasets from government portals and public data repositories."
        ),
        (SearchMode::Generative, false) => format!(
            "Generated {count} result{plural} for \"{query}\" from AI-powered analysis of the topic."
        ),
        (_, true) => format!(
            "Search completed with {count} synthesized result{plural} for \"{query}\". Live sources were temporarily unavailable."
        ),
    }
}
