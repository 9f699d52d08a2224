//! Per-provider configuration with sensible defaults.
//!
//! Every adapter receives an explicit configuration struct at construction
//! time. Nothing in this crate reads the environment: resolving API keys,
//! base URLs, and model names from env vars is the boundary layer's job,
//! which keeps adapters deterministic under test.

use crate::error::SearchError;

/// Default timeout for catalog provider requests in milliseconds.
pub const CATALOG_TIMEOUT_MS: u64 = 15_000;

/// Default timeout for generative provider requests in milliseconds.
pub const GENERATIVE_TIMEOUT_MS: u64 = 30_000;

/// Timeout for health probes in milliseconds. Deliberately short:
/// a probe answers "is this upstream reachable right now", nothing more.
pub const PROBE_TIMEOUT_MS: u64 = 5_000;

/// Configuration for the Data.gov CKAN catalog adapter.
#[derive(Debug, Clone)]
pub struct DataGovConfig {
    /// CKAN action API root, without a trailing slash.
    pub base_url: String,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DataGovConfig {
    fn default() -> Self {
        Self {
            base_url: "https://catalog.data.gov/api/3/action".into(),
            timeout_ms: CATALOG_TIMEOUT_MS,
        }
    }
}

/// Configuration for the EU Open Data Portal adapter.
#[derive(Debug, Clone)]
pub struct EuPortalConfig {
    /// Search hub API root, without a trailing slash.
    pub base_url: String,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EuPortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.europa.eu/api/hub/search".into(),
            timeout_ms: CATALOG_TIMEOUT_MS,
        }
    }
}

/// Configuration for a local Ollama generative adapter.
///
/// Ollama needs no credentials; an unreachable instance surfaces as an
/// ordinary HTTP failure and the aggregator falls through to synthesis.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Ollama server root, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Model name passed to `/api/generate`.
    pub model: String,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.2:3b".into(),
            timeout_ms: GENERATIVE_TIMEOUT_MS,
        }
    }
}

/// Configuration for the Grok chat-completions adapter.
///
/// `api_key: None` is a legitimate, detectable state: the adapter then
/// serves synthesized content without touching the network.
#[derive(Debug, Clone)]
pub struct GrokConfig {
    /// Bearer token for the API. `None` selects offline fallback mode.
    pub api_key: Option<String>,
    /// API root, e.g. `https://api.x.ai/v1`.
    pub base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GrokConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.x.ai/v1".into(),
            model: "grok-beta".into(),
            timeout_ms: GENERATIVE_TIMEOUT_MS,
        }
    }
}

impl GrokConfig {
    /// Returns `true` when a non-empty API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Configuration for the Hugging Face inference adapter.
///
/// Like Grok, `api_key: None` is a legitimate, detectable state selecting
/// offline fallback mode. When configured, the adapter embeds the query
/// through the inference API and generates results from the semantic
/// signal instead of prompting a text model.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Bearer token for the inference API. `None` selects offline mode.
    pub api_key: Option<String>,
    /// Inference API root, e.g. `https://api-inference.huggingface.co`.
    pub base_url: String,
    /// Sentence-embedding model id used to embed queries.
    pub embedding_model: String,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api-inference.huggingface.co".into(),
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".into(),
            timeout_ms: GENERATIVE_TIMEOUT_MS,
        }
    }
}

impl HuggingFaceConfig {
    /// Returns `true` when a non-empty API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Validate the invariants shared by all provider configurations.
///
/// # Errors
///
/// Returns [`SearchError::Config`] when `base_url` is empty or
/// `timeout_ms` is zero.
pub fn validate_endpoint(base_url: &str, timeout_ms: u64) -> Result<(), SearchError> {
    if base_url.trim().is_empty() {
        return Err(SearchError::Config("base_url must not be empty".into()));
    }
    if timeout_ms == 0 {
        return Err(SearchError::Config(
            "timeout_ms must be greater than 0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datagov_defaults() {
        let config = DataGovConfig::default();
        assert!(config.base_url.contains("catalog.data.gov"));
        assert_eq!(config.timeout_ms, 15_000);
    }

    #[test]
    fn eu_portal_defaults() {
        let config = EuPortalConfig::default();
        assert!(config.base_url.contains("data.europa.eu"));
        assert_eq!(config.timeout_ms, 15_000);
    }

    #[test]
    fn ollama_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn grok_defaults_to_unconfigured() {
        let config = GrokConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.model, "grok-beta");
    }

    #[test]
    fn grok_with_key_is_configured() {
        let config = GrokConfig {
            api_key: Some("xai-test".into()),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn grok_blank_key_counts_as_unconfigured() {
        let config = GrokConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn huggingface_defaults_to_unconfigured() {
        let config = HuggingFaceConfig::default();
        assert!(!config.is_configured());
        assert!(config.base_url.contains("api-inference.huggingface.co"));
        assert_eq!(config.embedding_model, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn huggingface_with_key_is_configured() {
        let config = HuggingFaceConfig {
            api_key: Some("hf_test".into()),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn empty_base_url_rejected() {
        let err = validate_endpoint("", 1000).unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = validate_endpoint("http://localhost", 0).unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn valid_endpoint_passes() {
        assert!(validate_endpoint("http://localhost:11434", 30_000).is_ok());
    }
}
