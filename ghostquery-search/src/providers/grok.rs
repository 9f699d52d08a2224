//! Grok generative adapter over the chat-completions API.
//!
//! The adapter is usable without credentials: a missing API key settles to
//! [`SearchError::Unconfigured`] without touching the network, and the
//! aggregator serves that share from the deterministic synthesizer.
//! Offline mode is a first-class state, not a fault.

use crate::config::{GrokConfig, PROBE_TIMEOUT_MS};
use crate::error::{Result, SearchError};
use crate::http;
use crate::provider::{map_transport_err, ProviderAdapter, ProviderOutcome};
use crate::text;
use crate::types::{ProviderKind, SearchQuery};
use serde::Deserialize;
use serde_json::json;

/// Default score for structured records missing `relevance_score`.
const DEFAULT_RECORD_SCORE: f64 = 0.8;

/// Floor for paragraph-fallback scores.
const FALLBACK_MIN_SCORE: f64 = 0.5;

const SYSTEM_PROMPT: &str = "You are a search assistant that returns structured, factual results. \
     Always respond with a single JSON object of the form \
     {\"results\": [{\"title\": \"...\", \"snippet\": \"...\", \"url\": \"...\", \"relevance_score\": 0.9}]} \
     and nothing else.";

/// Adapter for the Grok chat-completions API.
#[derive(Debug, Clone)]
pub struct GrokProvider {
    config: GrokConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

impl GrokProvider {
    /// Create the adapter after validating the endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an empty base URL or a zero
    /// timeout. A missing API key is not an error.
    pub fn new(config: GrokConfig) -> Result<Self> {
        crate::config::validate_endpoint(&config.base_url, config.timeout_ms)?;
        Ok(Self { config })
    }

    fn build_user_prompt(query: &str, share: usize) -> String {
        format!("Provide up to {share} relevant results for this search query: \"{query}\"")
    }
}

impl ProviderAdapter for GrokProvider {
    async fn fetch(&self, query: &SearchQuery, share: usize) -> ProviderOutcome {
        if !self.config.is_configured() {
            tracing::debug!(query = query.text(), "Grok key absent, offline mode");
            return Err(SearchError::Unconfigured("no Grok API key set".into()));
        }

        tracing::debug!(
            query = query.text(),
            model = %self.config.model,
            "querying Grok"
        );
        let client = http::build_client(self.config.timeout_ms)?;
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::build_user_prompt(query.text(), share)}
            ],
            "temperature": 0.7,
            "top_p": 0.9,
            "max_tokens": 2000
        });
        let response = client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_err(e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Upstream(status.as_u16()));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("invalid Grok response: {e}")))?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| SearchError::Parse("Grok returned no choices".into()))?;

        Ok(text::text_to_results(
            &content,
            query.text(),
            ProviderKind::Grok,
            DEFAULT_RECORD_SCORE,
            FALLBACK_MIN_SCORE,
        ))
    }

    /// Always reports healthy. Without a key the synthesizer serves every
    /// request, and with a key a transient API failure still falls through
    /// to synthesis at the aggregator. Actual connectivity is logged for
    /// operators but never flips the report.
    async fn probe(&self) -> bool {
        if !self.config.is_configured() {
            return true;
        }
        let Ok(client) = http::build_client(PROBE_TIMEOUT_MS) else {
            return true;
        };
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": "ping"}],
            "max_tokens": 1
        });
        let reachable = match client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        };
        if !reachable {
            tracing::warn!("Grok API unreachable, requests will serve synthesized results");
        }
        true
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Grok
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }
}
