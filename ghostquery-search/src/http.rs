//! Shared HTTP client construction for provider requests.

use crate::error::SearchError;
use std::time::Duration;

/// User-Agent sent with every upstream request.
pub const USER_AGENT: &str = "GhostQuery-SearchPortal/1.0";

/// Build a [`reqwest::Client`] for one provider call.
///
/// The client carries the portal User-Agent and the caller's deadline as
/// the request timeout. Adapters additionally wrap calls in
/// [`tokio::time::timeout`] so that a stalled connection still settles to
/// a typed timeout failure.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(timeout_ms: u64) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}
