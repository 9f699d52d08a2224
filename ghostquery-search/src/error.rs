//! Error types for the ghostquery-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or sensitive data appear in
//! error messages.

/// Errors that can occur during search aggregation.
///
/// Adapter failures are contained at the aggregator boundary: they decide
/// which results appear in a response, they never abort the aggregation
/// call itself.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A provider call exceeded its deadline.
    #[error("provider timed out after {0} ms")]
    Timeout(u64),

    /// A provider answered with a non-success HTTP status.
    #[error("upstream error: HTTP {0}")]
    Upstream(u16),

    /// The provider has no credentials configured.
    ///
    /// This is expected degraded operation, not a fault: adapters that hit
    /// this state serve synthesized content instead of calling the network.
    #[error("provider not configured: {0}")]
    Unconfigured(String),

    /// An HTTP request failed before a status was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider response payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid query or provider configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for ghostquery-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
