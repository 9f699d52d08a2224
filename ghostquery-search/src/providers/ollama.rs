//! Local Ollama generative adapter over the native `/api/generate` endpoint.

use crate::config::{OllamaConfig, PROBE_TIMEOUT_MS};
use crate::error::{Result, SearchError};
use crate::http;
use crate::provider::{map_transport_err, ProviderAdapter, ProviderOutcome};
use crate::text;
use crate::types::{ProviderKind, SearchQuery};
use serde::Deserialize;
use serde_json::json;

/// Default score for structured records missing `relevance_score`.
const DEFAULT_RECORD_SCORE: f64 = 0.5;

/// Floor for paragraph-fallback scores.
const FALLBACK_MIN_SCORE: f64 = 0.3;

/// Adapter for a locally running Ollama instance.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    config: OllamaConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaProvider {
    /// Create the adapter after validating the endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an empty base URL or a zero
    /// timeout.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        crate::config::validate_endpoint(&config.base_url, config.timeout_ms)?;
        Ok(Self { config })
    }

    fn build_prompt(query: &str, share: usize) -> String {
        format!(
            "You are a search assistant. Provide up to {share} relevant, factual results for the query: \"{query}\"\n\n\
             Respond with a JSON object in exactly this format:\n\
             {{\"results\": [{{\"title\": \"...\", \"snippet\": \"...\", \"url\": \"...\", \"relevance_score\": 0.9}}]}}\n\n\
             Each snippet should be 1-2 informative sentences. Omit the url field if no authoritative URL exists. \
             Do not include any text outside the JSON object."
        )
    }
}

impl ProviderAdapter for OllamaProvider {
    async fn fetch(&self, query: &SearchQuery, share: usize) -> ProviderOutcome {
        tracing::debug!(
            query = query.text(),
            model = %self.config.model,
            "querying Ollama"
        );
        let client = http::build_client(self.config.timeout_ms)?;
        let url = format!("{}/api/generate", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "prompt": Self::build_prompt(query.text(), share),
            "stream": false,
            "options": {
                "temperature": 0.7,
                "top_p": 0.9,
                "num_predict": 2000
            }
        });
        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_err(e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Upstream(status.as_u16()));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("invalid Ollama response: {e}")))?;
        if payload.response.trim().is_empty() {
            return Err(SearchError::Parse("Ollama returned an empty response".into()));
        }

        Ok(text::text_to_results(
            &payload.response,
            query.text(),
            ProviderKind::Ollama,
            DEFAULT_RECORD_SCORE,
            FALLBACK_MIN_SCORE,
        ))
    }

    /// Truthful reachability probe against `/api/tags`. Unlike the
    /// credential-gated adapters, a local Ollama that is down really is
    /// unavailable.
    async fn probe(&self) -> bool {
        let Ok(client) = http::build_client(PROBE_TIMEOUT_MS) else {
            return false;
        };
        let url = format!("{}/api/tags", self.config.base_url);
        match client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "Ollama probe failed");
                false
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_query_and_share() {
        let prompt = OllamaProvider::build_prompt("renewable energy", 7);
        assert!(prompt.contains("renewable energy"));
        assert!(prompt.contains("up to 7"));
        assert!(prompt.contains("\"results\""));
    }

    #[test]
    fn generate_response_tolerates_extra_fields() {
        let raw = r#"{"model": "llama3.2:3b", "response": "hello", "done": true}"#;
        let payload: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.response, "hello");
    }

    #[test]
    fn rejects_invalid_config() {
        let config = OllamaConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(OllamaProvider::new(config).is_err());
    }
}
