//! Data.gov catalog adapter over the CKAN action API.

use crate::config::{DataGovConfig, PROBE_TIMEOUT_MS};
use crate::error::{Result, SearchError};
use crate::http;
use crate::normalize;
use crate::provider::{map_transport_err, ProviderAdapter, ProviderOutcome};
use crate::types::{ProviderKind, SearchQuery, SearchResult};
use serde::Deserialize;

/// Rank-decay scheme for CKAN results: the API sorts by its own relevance
/// score but does not expose it, so position stands in.
const SCORE_START: f64 = 0.9;
const SCORE_STEP: f64 = 0.05;
const SCORE_FLOOR: f64 = 0.3;

/// Adapter for the US government CKAN catalog at catalog.data.gov.
#[derive(Debug, Clone)]
pub struct DataGovProvider {
    config: DataGovConfig,
}

#[derive(Debug, Deserialize)]
struct PackageSearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: PackageSearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct PackageSearchResult {
    #[serde(default)]
    results: Vec<CkanDataset>,
}

#[derive(Debug, Default, Deserialize)]
struct CkanDataset {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    organization: Option<CkanOrganization>,
    #[serde(default)]
    metadata_modified: Option<String>,
    #[serde(default)]
    resources: Vec<CkanResource>,
}

#[derive(Debug, Default, Deserialize)]
struct CkanOrganization {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CkanResource {
    #[serde(default)]
    url: Option<String>,
}

impl DataGovProvider {
    /// Create the adapter after validating the endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an empty base URL or a zero
    /// timeout.
    pub fn new(config: DataGovConfig) -> Result<Self> {
        crate::config::validate_endpoint(&config.base_url, config.timeout_ms)?;
        Ok(Self { config })
    }

    fn normalize_dataset(index: usize, dataset: CkanDataset) -> SearchResult {
        // Dataset landing page, or the first resource's URL as a stand-in.
        let url = dataset
            .url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| dataset.resources.into_iter().find_map(|r| r.url));
        SearchResult {
            title: dataset
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| normalize::DEFAULT_DATASET_TITLE.to_owned()),
            snippet: normalize::truncate_snippet(dataset.notes.as_deref()),
            url,
            relevance_score: normalize::rank_decay(SCORE_START, SCORE_STEP, SCORE_FLOOR, index),
            source: ProviderKind::DataGov.name().to_owned(),
            organization: dataset.organization.and_then(|o| o.title),
            last_updated: dataset.metadata_modified,
        }
    }
}

impl ProviderAdapter for DataGovProvider {
    async fn fetch(&self, query: &SearchQuery, share: usize) -> ProviderOutcome {
        tracing::debug!(query = query.text(), rows = share, "searching Data.gov");
        let client = http::build_client(self.config.timeout_ms)?;
        let url = format!("{}/package_search", self.config.base_url);
        let response = client
            .get(&url)
            .query(&[
                ("q", query.text()),
                ("rows", &share.to_string()),
                ("sort", "score desc"),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| map_transport_err(e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Upstream(status.as_u16()));
        }

        let payload: PackageSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("invalid CKAN response: {e}")))?;
        if !payload.success {
            return Err(SearchError::Parse(
                "CKAN action reported success=false".into(),
            ));
        }

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
        let url = format!("{}/status_show", self.config.base_url);
        match client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "Data.gov probe failed");
                false
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::DataGov
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CKAN_PAYLOAD: &str = r#"{
        "success": true,
        "result": {
            "count": 2,
            "results": [
                {
                    "title": "National Climate Observations",
                    "notes": "Daily temperature and precipitation records.",
                    "url": "https://catalog.data.gov/dataset/climate-obs",
                    "organization": {"title": "NOAA"},
                    "metadata_modified": "2024-11-02T10:00:00",
                    "resources": [{"url": "https://download.example.gov/obs.csv"}]
                },
                {
                    "notes": null,
                    "resources": []
                }
            ]
        }
    }"#;

    #[test]
    fn payload_parses_and_normalizes() {
        let payload: PackageSearchResponse = serde_json::from_str(CKAN_PAYLOAD).unwrap();
        assert!(payload.success);
        let results: Vec<SearchResult> = payload
            .result
            .results
            .into_iter()
            .enumerate()
            .map(|(i, d)| DataGovProvider::normalize_dataset(i, d))
            .collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "National Climate Observations");
        assert_eq!(results[0].organization.as_deref(), Some("NOAA"));
        assert!((results[0].relevance_score - 0.9).abs() < f64::EPSILON);
        assert_eq!(
            results[0].url.as_deref(),
            Some("https://catalog.data.gov/dataset/climate-obs")
        );

        // Sparse record degrades to placeholders, never fails.
        assert_eq!(results[1].title, normalize::DEFAULT_DATASET_TITLE);
        assert_eq!(results[1].snippet, normalize::DEFAULT_SNIPPET);
        assert!(results[1].url.is_none());
        assert!((results[1].relevance_score - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_landing_page_falls_back_to_first_resource() {
        let dataset: CkanDataset = serde_json::from_str(
            r#"{"title": "Grid Load", "resources": [{"url": "https://example.gov/load.json"}]}"#,
        )
        .unwrap();
        let result = DataGovProvider::normalize_dataset(0, dataset);
        assert_eq!(result.url.as_deref(), Some("https://example.gov/load.json"));
    }

    #[test]
    fn deep_ranks_hit_score_floor() {
        let dataset = CkanDataset::default();
        let result = DataGovProvider::normalize_dataset(40, dataset);
        assert!((result.relevance_score - SCORE_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = DataGovConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(DataGovProvider::new(config).is_err());
    }
}
