//! GhostQuery search engine: concurrent multi-source search aggregation.
//!
//! The crate fans a validated query out to heterogeneous upstream
//! providers, normalizes their native payloads into a canonical result
//! shape, merges and ranks by relevance, and guarantees a non-empty
//! response through deterministic fallback synthesis when every live
//! source fails.
//!
//! Two provider families are supported:
//!
//! - **Catalog** providers (Data.gov, EU Open Data Portal) search
//!   government open-data registries and score results by rank position.
//! - **Generative** providers prompt a model for structured results and
//!   recover them from JSON or free prose (Ollama, Grok), or derive them
//!   from query embeddings (Hugging Face).
//!
//! # Example
//!
//! ```no_run
//! use ghostquery_search::{Aggregator, DataGovConfig, EuPortalConfig, SearchQuery};
//!
//! # async fn run() -> Result<(), ghostquery_search::SearchError> {
//! let aggregator = Aggregator::catalog(DataGovConfig::default(), EuPortalConfig::default())?;
//! let query = SearchQuery::with_default_limit("climate data")?;
//! let response = aggregator.search(&query).await;
//! println!("{} results in {} ms", response.total_results, response.processing_time_ms);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod normalize;
pub mod provider;
pub mod providers;
pub mod synth;
pub mod text;
pub mod types;

pub use aggregator::{Aggregator, SearchMode};
pub use config::{DataGovConfig, EuPortalConfig, GrokConfig, HuggingFaceConfig, OllamaConfig};
pub use error::{Result, SearchError};
pub use health::HealthReport;
pub use provider::{Provider, ProviderAdapter, ProviderOutcome};
pub use providers::{
    DataGovProvider, EuPortalProvider, GrokProvider, HuggingFaceProvider, OllamaProvider,
};
pub use types::{ProviderKind, SearchQuery, SearchResponse, SearchResult};
