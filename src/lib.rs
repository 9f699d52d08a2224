//! GhostQuery search portal: HTTP boundary over the aggregation engine.
//!
//! This crate owns everything request-scoped: route handling, input
//! sanitization, per-client rate limiting, environment configuration, and
//! the response envelope. The search semantics live in
//! [`ghostquery_search`].

pub mod config;
pub mod rate_limit;
pub mod server;
pub mod validation;

pub use config::{Config, ConfigError, GenerativeBackend};
pub use rate_limit::RateLimiter;
pub use server::{Envelope, ErrorBody, SearchRequest, SearchServer};
