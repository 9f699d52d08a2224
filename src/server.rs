//! HTTP server for the GhostQuery search portal.
//!
//! Exposes the aggregation engine over a small JSON API. Every successful
//! response is wrapped in a uniform envelope carrying the payload, an
//! RFC 3339 timestamp, and the search flavor that produced it.
//!
//! ## Endpoints
//!
//! - `POST /api/search` — open-data catalog search (JSON body)
//! - `GET  /api/search` — same, via query string
//! - `POST /api/ai-search` — generative search (JSON body)
//! - `GET  /api/ai-search` — same, via query string
//! - `GET  /api/search/health` — catalog provider liveness report
//! - `GET  /api/ai-search/health` — generative backend liveness report

use crate::config::{Config, GenerativeBackend};
use crate::rate_limit::RateLimiter;
use crate::validation;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use ghostquery_search::{Aggregator, SearchError, SearchQuery, SearchResponse};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// How often expired rate-limit windows are purged.
const PURGE_INTERVAL_SECS: u64 = 60;

/// The `search_type` label for catalog responses.
const TYPE_OPEN_DATA: &str = "open_data";

/// The `search_type` label for generative responses.
const TYPE_AI_POWERED: &str = "ai_powered";

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

/// A search request, accepted as a JSON body or query-string parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// The query text.
    pub query: String,
    /// Requested result count; defaults to 10 when omitted.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Uniform success envelope for API responses.
#[derive(Debug, Serialize)]
pub struct Envelope {
    /// Always `true` for this envelope.
    pub success: bool,
    /// The search response payload.
    pub data: SearchResponse,
    /// RFC 3339 timestamp of when the response was produced.
    pub timestamp: String,
    /// Which search flavor served this request.
    pub search_type: &'static str,
}

/// Error body for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short machine-friendly error label.
    pub error: String,
    /// Human-readable detail, safe to echo.
    pub message: String,
}

/// Per-provider entry in the health report.
#[derive(Debug, Serialize)]
struct HealthEntry {
    provider: String,
    healthy: bool,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    timestamp: String,
    providers: Vec<HealthEntry>,
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Aggregator>,
    generative: Arc<Aggregator>,
    search_limiter: Arc<RateLimiter>,
    ai_limiter: Arc<RateLimiter>,
}

// ---------------------------------------------------------------------------
// SearchServer
// ---------------------------------------------------------------------------

/// The GhostQuery HTTP server.
///
/// Owns two aggregators: a catalog aggregator fanning out to the open-data
/// portals, and a generative aggregator backed by whichever backend the
/// configuration selected (Hugging Face, Grok, or Ollama).
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
    /// Handle to the rate-limit purge task.
    purge_handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the server.
    ///
    /// Binds to `config.bind` (use port `0` for auto-assign) and begins
    /// serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider configuration is invalid or the TCP
    /// listener cannot bind.
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(Aggregator::catalog(
            config.datagov.clone(),
            config.eu_portal.clone(),
        )?);
        let generative = Arc::new(match config.generative_backend {
            GenerativeBackend::Grok => Aggregator::grok(config.grok.clone())?,
            GenerativeBackend::Ollama => Aggregator::ollama(config.ollama.clone())?,
            GenerativeBackend::HuggingFace => {
                Aggregator::huggingface(config.huggingface.clone())?
            }
        });

        let search_limiter = Arc::new(RateLimiter::new(config.rate_limit, config.rate_window_ms));
        let ai_limiter = Arc::new(RateLimiter::new(config.ai_rate_limit, config.rate_window_ms));

        let state = AppState {
            catalog,
            generative,
            search_limiter: Arc::clone(&search_limiter),
            ai_limiter: Arc::clone(&ai_limiter),
        };

        let app = Router::new()
            .route("/api/search", get(handle_search_get).post(handle_search_post))
            .route(
                "/api/ai-search",
                get(handle_ai_search_get).post(handle_ai_search_post),
            )
            .route("/api/search/health", get(handle_search_health))
            .route("/api/ai-search/health", get(handle_ai_search_health))
            .with_state(state);

        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|e| anyhow::anyhow!("server bind failed: {e}"))?;
        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("failed to get local addr: {e}"))?;

        info!("GhostQuery server listening on http://{addr}/api");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("server error: {e}");
            }
        });

        let purge_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));
            loop {
                ticker.tick().await;
                search_limiter.purge_expired();
                ai_limiter.purge_expired();
            }
        });

        Ok(Self {
            addr,
            handle,
            purge_handle,
        })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server and purge tasks.
    pub fn shutdown(&self) {
        self.handle.abort();
        self.purge_handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
        self.purge_handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Identify the client for rate limiting: proxy headers first, then a
/// shared fallback bucket.
fn client_id(headers: &HeaderMap) -> String {
    for header in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = headers.get(header).and_then(|v| v.to_str().ok()) {
            let first = value.split(',').next().unwrap_or(value).trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }
    "unknown".to_owned()
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn error_response(status: StatusCode, error: &str, message: String) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_owned(),
            message,
        }),
    )
        .into_response()
}

fn rejection(err: SearchError) -> Response {
    error_response(StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
}

fn too_many_requests() -> Response {
    error_response(
        StatusCode::TOO_MANY_REQUESTS,
        "rate_limited",
        "too many requests, try again later".to_owned(),
    )
}

async fn run_search(
    aggregator: &Aggregator,
    limiter: &RateLimiter,
    headers: &HeaderMap,
    request: SearchRequest,
    search_type: &'static str,
) -> Response {
    let client = client_id(headers);
    if !limiter.allow(&client) {
        tracing::warn!(client = %client, search_type, "rate limit exceeded");
        return too_many_requests();
    }

    let query: SearchQuery = match validation::validated_query(&request.query, request.limit) {
        Ok(query) => query,
        Err(err) => return rejection(err),
    };

    tracing::info!(query = query.text(), limit = query.limit(), search_type, "search request");
    let data = aggregator.search(&query).await;

    Json(Envelope {
        success: true,
        data,
        timestamp: now_rfc3339(),
        search_type,
    })
    .into_response()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn handle_search_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Response {
    run_search(
        &state.catalog,
        &state.search_limiter,
        &headers,
        request,
        TYPE_OPEN_DATA,
    )
    .await
}

async fn handle_search_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<SearchRequest>,
) -> Response {
    run_search(
        &state.catalog,
        &state.search_limiter,
        &headers,
        request,
        TYPE_OPEN_DATA,
    )
    .await
}

async fn handle_ai_search_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Response {
    run_search(
        &state.generative,
        &state.ai_limiter,
        &headers,
        request,
        TYPE_AI_POWERED,
    )
    .await
}

async fn handle_ai_search_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<SearchRequest>,
) -> Response {
    run_search(
        &state.generative,
        &state.ai_limiter,
        &headers,
        request,
        TYPE_AI_POWERED,
    )
    .await
}

async fn health_body(aggregator: &Aggregator) -> HealthBody {
    let providers: Vec<HealthEntry> = aggregator
        .health()
        .await
        .into_iter()
        .map(|report| HealthEntry {
            provider: report.provider.name().to_owned(),
            healthy: report.healthy,
        })
        .collect();
    let status = if providers.iter().any(|p| p.healthy) {
        "ok"
    } else {
        "degraded"
    };

    HealthBody {
        status,
        timestamp: now_rfc3339(),
        providers,
    }
}

/// `GET /api/search/health` — probe the catalog providers.
async fn handle_search_health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(health_body(&state.catalog).await)
}

/// `GET /api/ai-search/health` — probe the generative backend.
async fn handle_ai_search_health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(health_body(&state.generative).await)
}
