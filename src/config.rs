//! Server configuration resolved from the environment.
//!
//! All environment access happens here, once, at startup. The engine
//! crate's provider configs are built from the resolved values so the rest
//! of the system never reads env vars.

use ghostquery_search::{
    DataGovConfig, EuPortalConfig, GrokConfig, HuggingFaceConfig, OllamaConfig,
};
use std::net::SocketAddr;
use thiserror::Error;

/// Default bind address when `GHOSTQUERY_BIND` is unset.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default fixed-window capacity for the catalog search route.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Default fixed-window capacity for the AI search route. Generative
/// backends are slower and costlier, so the window is tighter.
pub const DEFAULT_AI_RATE_LIMIT: u32 = 50;

/// Default rate-limit window length in milliseconds (15 minutes).
pub const DEFAULT_RATE_WINDOW_MS: u64 = 900_000;

/// Which backend serves the AI search route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerativeBackend {
    /// Grok chat completions; serves synthesized results without a key.
    Grok,
    /// Local Ollama instance.
    Ollama,
    /// Hugging Face inference API, embedding-driven.
    HuggingFace,
}

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse.
    #[error("invalid value for {var}: {message}")]
    Invalid {
        /// The offending variable name.
        var: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub bind: SocketAddr,
    /// Data.gov adapter configuration.
    pub datagov: DataGovConfig,
    /// EU Open Data Portal adapter configuration.
    pub eu_portal: EuPortalConfig,
    /// Ollama adapter configuration.
    pub ollama: OllamaConfig,
    /// Grok adapter configuration.
    pub grok: GrokConfig,
    /// Hugging Face adapter configuration.
    pub huggingface: HuggingFaceConfig,
    /// Backend serving `/api/ai-search`.
    pub generative_backend: GenerativeBackend,
    /// Requests allowed per window on `/api/search`.
    pub rate_limit: u32,
    /// Requests allowed per window on `/api/ai-search`.
    pub ai_rate_limit: u32,
    /// Fixed rate-limit window length in milliseconds.
    pub rate_window_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.parse().expect("default bind address parses"),
            datagov: DataGovConfig::default(),
            eu_portal: EuPortalConfig::default(),
            ollama: OllamaConfig::default(),
            grok: GrokConfig::default(),
            huggingface: HuggingFaceConfig::default(),
            generative_backend: GenerativeBackend::Grok,
            rate_limit: DEFAULT_RATE_LIMIT,
            ai_rate_limit: DEFAULT_AI_RATE_LIMIT,
            rate_window_ms: DEFAULT_RATE_WINDOW_MS,
        }
    }
}

impl Config {
    /// Resolve configuration from environment variables, falling back to
    /// defaults for anything unset or blank.
    ///
    /// Recognized variables: `GHOSTQUERY_BIND`, `DATA_GOV_BASE_URL`,
    /// `EU_ODP_BASE_URL`, `OLLAMA_BASE_URL`, `OLLAMA_MODEL`,
    /// `GROK_API_KEY`, `GROK_BASE_URL`, `GROK_MODEL`,
    /// `HUGGINGFACE_API_KEY`, `HUGGINGFACE_BASE_URL`,
    /// `HUGGINGFACE_EMBEDDING_MODEL`, `SEARCH_TIMEOUT` (milliseconds,
    /// applied to the catalog providers), `RATE_LIMIT_MAX_REQUESTS`,
    /// `RATE_LIMIT_WINDOW_MS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(bind) = env_string("GHOSTQUERY_BIND") {
            config.bind = bind.parse().map_err(|e| ConfigError::Invalid {
                var: "GHOSTQUERY_BIND",
                message: format!("{e}"),
            })?;
        }
        if let Some(url) = env_string("DATA_GOV_BASE_URL") {
            config.datagov.base_url = url;
        }
        if let Some(url) = env_string("EU_ODP_BASE_URL") {
            config.eu_portal.base_url = url;
        }
        if let Some(url) = env_string("OLLAMA_BASE_URL") {
            config.ollama.base_url = url;
        }
        if let Some(model) = env_string("OLLAMA_MODEL") {
            config.ollama.model = model;
        }
        if let Some(key) = env_string("GROK_API_KEY") {
            config.grok.api_key = Some(key);
        }
        if let Some(url) = env_string("GROK_BASE_URL") {
            config.grok.base_url = url;
        }
        if let Some(model) = env_string("GROK_MODEL") {
            config.grok.model = model;
        }
        if let Some(key) = env_string("HUGGINGFACE_API_KEY") {
            config.huggingface.api_key = Some(key);
        }
        if let Some(url) = env_string("HUGGINGFACE_BASE_URL") {
            config.huggingface.base_url = url;
        }
        if let Some(model) = env_string("HUGGINGFACE_EMBEDDING_MODEL") {
            config.huggingface.embedding_model = model;
        }
        if let Some(timeout) = env_parse::<u64>("SEARCH_TIMEOUT")? {
            config.datagov.timeout_ms = timeout;
            config.eu_portal.timeout_ms = timeout;
        }
        if let Some(max) = env_parse::<u32>("RATE_LIMIT_MAX_REQUESTS")? {
            config.rate_limit = max;
        }
        if let Some(window) = env_parse::<u64>("RATE_LIMIT_WINDOW_MS")? {
            config.rate_window_ms = window;
        }

        // Keyed backends take the AI route first (Hugging Face, then
        // Grok); a local Ollama is used only when neither key is set. An
        // unconfigured Grok still serves synthesized results.
        if config.huggingface.is_configured() {
            config.generative_backend = GenerativeBackend::HuggingFace;
        } else if !config.grok.is_configured() && env_string("OLLAMA_BASE_URL").is_some() {
            config.generative_backend = GenerativeBackend::Ollama;
        }

        Ok(config)
    }
}

fn env_string(var: &'static str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env_string(var) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|e| ConfigError::Invalid {
            var,
            message: format!("{e}"),
        }),
    }
}
