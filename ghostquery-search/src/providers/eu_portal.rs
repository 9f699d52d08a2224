//! EU Open Data Portal adapter over the data.europa.eu search hub.

use crate::config::{EuPortalConfig, PROBE_TIMEOUT_MS};
use crate::error::{Result, SearchError};
use crate::http;
use crate::normalize;
use crate::provider::{map_transport_err, ProviderAdapter, ProviderOutcome};
use crate::types::{ProviderKind, SearchQuery, SearchResult};
use serde::Deserialize;

/// Slightly below the Data.gov scheme so US catalog hits outrank EU hits
/// at equal positions, matching the 70/30 share split.
const SCORE_START: f64 = 0.8;
const SCORE_STEP: f64 = 0.05;
const SCORE_FLOOR: f64 = 0.25;

/// Adapter for the EU Open Data Portal at data.europa.eu.
#[derive(Debug, Clone)]
pub struct EuPortalProvider {
    config: EuPortalConfig,
}

#[derive(Debug, Deserialize)]
struct HubSearchResponse {
    #[serde(default)]
    result: HubSearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct HubSearchResult {
    #[serde(default)]
    results: Vec<HubDataset>,
}

#[derive(Debug, Default, Deserialize)]
struct HubDataset {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "landingPage")]
    landing_page: Option<String>,
    #[serde(default)]
    publisher: Option<HubPublisher>,
    #[serde(default)]
    modified: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HubPublisher {
    #[serde(default)]
    name: Option<String>,
}

impl EuPortalProvider {
    /// Create the adapter after validating the endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an empty base URL or a zero
    /// timeout.
    pub fn new(config: EuPortalConfig) -> Result<Self> {
        crate::config::validate_endpoint(&config.base_url, config.timeout_ms)?;
        Ok(Self { config })
    }

    fn normalize_dataset(index: usize, dataset: HubDataset) -> SearchResult {
        SearchResult {
            title: dataset
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| normalize::DEFAULT_DATASET_TITLE.to_owned()),
            snippet: normalize::truncate_snippet(dataset.description.as_deref()),
            url: dataset.landing_page.filter(|u| !u.trim().is_empty()),
            relevance_score: normalize::rank_decay(SCORE_START, SCORE_STEP, SCORE_FLOOR, index),
            source: ProviderKind::EuPortal.name().to_owned(),
            organization: dataset.publisher.and_then(|p| p.name),
            last_updated: dataset.modified,
        }
    }
}

impl ProviderAdapter for EuPortalProvider {
    async fn fetch(&self, query: &SearchQuery, share: usize) -> ProviderOutcome {
        tracing::debug!(query = query.text(), limit = share, "searching EU portal");
        let client = http::build_client(self.config.timeout_ms)?;
        let url = format!("{}/datasets", self.config.base_url);
        let response = client
            .get(&url)
            .query(&[
                ("query", query.text()),
                ("limit", &share.to_string()),
                ("sort", "relevance+desc"),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| map_transport_err(e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Upstream(status.as_u16()));
        }

        let payload: HubSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("invalid hub response: {e}")))?;

        Ok(payload
            .result
            .results
            .into_iter()
            .enumerate()
            .map(|(index, dataset)| Self::normalize_dataset(index, dataset))
            .collect())
    }

    async fn probe(&self) -> bool {
        let Ok(client) = http::build_client(PROBE_TIMEOUT_MS) else {
            return false;
        };
        let url = format!("{}/datasets", self.config.base_url);
        match client
            .get(&url)
            .query(&[("query", "data"), ("limit", "1")])
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "EU portal probe failed");
                false
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::EuPortal
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB_PAYLOAD: &str = r#"{
        "result": {
            "count": 2,
            "results": [
                {
                    "title": "Air Quality Measurements",
                    "description": "Hourly pollutant concentrations from member states.",
                    "landingPage": "https://data.europa.eu/data/datasets/air-quality",
                    "publisher": {"name": "European Environment Agency"},
                    "modified": "2024-10-18"
                },
                {
                    "title": "  "
                }
            ]
        }
    }"#;

    #[test]
    fn payload_parses_and_normalizes() {
        let payload: HubSearchResponse = serde_json::from_str(HUB_PAYLOAD).unwrap();
        let results: Vec<SearchResult> = payload
            .result
            .results
            .into_iter()
            .enumerate()
            .map(|(i, d)| EuPortalProvider::normalize_dataset(i, d))
            .collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Air Quality Measurements");
        assert_eq!(
            results[0].organization.as_deref(),
            Some("European Environment Agency")
        );
        assert!((results[0].relevance_score - 0.8).abs() < f64::EPSILON);

        assert_eq!(results[1].title, normalize::DEFAULT_DATASET_TITLE);
        assert!((results[1].relevance_score - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn deep_ranks_hit_score_floor() {
        let result = EuPortalProvider::normalize_dataset(30, HubDataset::default());
        assert!((result.relevance_score - SCORE_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn first_position_scores_below_datagov_first_position() {
        let result = EuPortalProvider::normalize_dataset(0, HubDataset::default());
        assert!(result.relevance_score < 0.9);
    }
}
