//! Trait definition and dispatch for pluggable provider adapters.
//!
//! Each upstream (Data.gov, EU Open Data Portal, Ollama, Grok, Hugging
//! Face) implements [`ProviderAdapter`] to present a uniform fetch/probe
//! interface. The
//! aggregator holds concrete adapters behind the [`Provider`] enum and
//! dispatches without dynamic allocation.

use crate::error::SearchError;
use crate::providers::{
    DataGovProvider, EuPortalProvider, GrokProvider, HuggingFaceProvider, OllamaProvider,
};
use crate::types::{ProviderKind, SearchQuery, SearchResult};
use std::time::Duration;

/// The settled outcome of one adapter invocation: a full result set or a
/// typed failure, never partially filled.
pub type ProviderOutcome = Result<Vec<SearchResult>, SearchError>;

/// A pluggable upstream provider adapter.
///
/// Implementors own their request construction, response normalization,
/// and error mapping. Each adapter:
///
/// - builds a provider-specific request (search URL for catalogs, a
///   structured prompt for generative backends)
/// - enforces its own deadline
/// - maps non-success statuses to [`SearchError::Upstream`]
/// - normalizes the native payload into canonical results
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
pub trait ProviderAdapter: Send + Sync {
    /// Fetch up to `share` results for the query.
    ///
    /// `share` is this provider's slice of the caller's overall limit; the
    /// aggregator may over-request and truncates once at the end.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] for timeouts, non-success statuses, and
    /// unparseable payloads. Failures are contained by the aggregator.
    fn fetch(
        &self,
        query: &SearchQuery,
        share: usize,
    ) -> impl std::future::Future<Output = ProviderOutcome> + Send;

    /// Lightweight liveness probe, independent of search execution.
    ///
    /// Catalog adapters report reachability truthfully. Credential-gated
    /// generative adapters report healthy even without credentials: the
    /// portal degrades quality, not availability.
    fn probe(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Which upstream this adapter wraps.
    fn kind(&self) -> ProviderKind;

    /// This adapter's per-request deadline in milliseconds.
    fn timeout_ms(&self) -> u64;
}

/// Map a transport-level [`reqwest::Error`] to the crate taxonomy.
///
/// Client-side timeouts become [`SearchError::Timeout`]; everything else
/// that failed before a status arrived is [`SearchError::Http`].
pub(crate) fn map_transport_err(err: reqwest::Error, timeout_ms: u64) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(timeout_ms)
    } else {
        SearchError::Http(format!("request failed: {err}"))
    }
}

/// A configured provider adapter, enum-dispatched for concurrent fan-out.
#[derive(Debug)]
pub enum Provider {
    /// US government CKAN catalog.
    DataGov(DataGovProvider),
    /// EU Open Data Portal.
    EuPortal(EuPortalProvider),
    /// Local Ollama generative backend.
    Ollama(OllamaProvider),
    /// Grok chat-completions backend.
    Grok(GrokProvider),
    /// Hugging Face inference backend.
    HuggingFace(HuggingFaceProvider),
}

impl Provider {
    /// Which upstream this provider wraps.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::DataGov(p) => p.kind(),
            Self::EuPortal(p) => p.kind(),
            Self::Ollama(p) => p.kind(),
            Self::Grok(p) => p.kind(),
            Self::HuggingFace(p) => p.kind(),
        }
    }

    /// Fixed share of the overall limit this provider is asked for.
    pub fn share_weight(&self) -> f64 {
        self.kind().share_weight()
    }

    /// Fetch results under the adapter's deadline.
    ///
    /// The call is additionally wrapped in [`tokio::time::timeout`] so a
    /// stalled connection settles to [`SearchError::Timeout`] rather than
    /// hanging the join barrier.
    pub async fn fetch(&self, query: &SearchQuery, share: usize) -> ProviderOutcome {
        let deadline = self.timeout_ms();
        let call = async {
            match self {
                Self::DataGov(p) => p.fetch(query, share).await,
                Self::EuPortal(p) => p.fetch(query, share).await,
                Self::Ollama(p) => p.fetch(query, share).await,
                Self::Grok(p) => p.fetch(query, share).await,
                Self::HuggingFace(p) => p.fetch(query, share).await,
            }
        };
        match tokio::time::timeout(Duration::from_millis(deadline), call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SearchError::Timeout(deadline)),
        }
    }

    /// Probe this provider's upstream.
    pub async fn probe(&self) -> bool {
        match self {
            Self::DataGov(p) => p.probe().await,
            Self::EuPortal(p) => p.probe().await,
            Self::Ollama(p) => p.probe().await,
            Self::Grok(p) => p.probe().await,
            Self::HuggingFace(p) => p.probe().await,
        }
    }

    fn timeout_ms(&self) -> u64 {
        match self {
            Self::DataGov(p) => p.timeout_ms(),
            Self::EuPortal(p) => p.timeout_ms(),
            Self::Ollama(p) => p.timeout_ms(),
            Self::Grok(p) => p.timeout_ms(),
            Self::HuggingFace(p) => p.timeout_ms(),
        }
    }
}
