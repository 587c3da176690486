//! HTTP API server.
//!
//! Exposes the catalog and the search-merge engine over a small JSON API so
//! browser frontends can drive the same suggestion list as the CLI.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/search?q=&limit=` | Merged suggestion list for a query |
//! | `GET`  | `/place/{id}` | Full catalog record by id |
//! | `POST` | `/functions/generate-place-info` | Direct AI lookup for a place name |
//!
//! # Error Contract
//!
//! Request errors use a structured body:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404). The lookup endpoint
//! never uses this shape for lookup outcomes; those travel in the
//! `{ success, data, error }` envelope the frontend already understands,
//! with HTTP 500 reserved for transport failures.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use culturevault_core::catalog::Catalog;
use culturevault_core::models::PlaceRecord;
use culturevault_core::search::{SearchMerge, SearchOptions, Suggestion};
use culturevault_core::store::memory::{MemoryHistory, MemoryStash};
use culturevault_core::store::{LookupResponse, RemoteLookup};

use crate::config::Config;
use crate::dataset;
use crate::gateway;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    lookup: Arc<dyn RemoteLookup>,
    options: SearchOptions,
}

/// Starts the HTTP server.
///
/// Binds to `[server].host`/`[server].port` and serves until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let catalog = Arc::new(dataset::load_catalog(config)?);
    let lookup = gateway::create_lookup(&config.gateway)?;

    println!(
        "Catalog loaded: {} places. Gateway provider: {}.",
        catalog.len(),
        config.gateway.provider
    );

    let state = AppState {
        catalog,
        lookup,
        options: config.search.to_options(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search))
        .route("/place/{id}", get(handle_place))
        .route("/functions/generate-place-info", post(handle_generate))
        .layer(cors)
        .with_state(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    println!("CultureVault server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    suggestions: Vec<Suggestion>,
}

/// Handler for `GET /search`.
///
/// Runs the query through a per-request merge engine. An empty `q` returns
/// the default catalog slice; a sparse query also consults the configured
/// remote lookup. `limit` truncates the merged list.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let mut options = state.options.clone();
    // Per-request engine; there is no keystroke stream to debounce.
    options.debounce = Duration::ZERO;

    let mut engine = SearchMerge::new(
        state.catalog.clone(),
        state.lookup.clone(),
        Arc::new(MemoryHistory::new()),
        Arc::new(MemoryStash::new()),
        options,
    );
    engine.open();
    engine.on_query_changed(&params.q);
    engine.settle().await;

    let mut suggestions = engine.results();
    if let Some(limit) = params.limit {
        suggestions.truncate(limit);
    }

    Json(SearchResponse {
        query: params.q,
        suggestions,
    })
}

// ============ GET /place/{id} ============

/// Handler for `GET /place/{id}`.
///
/// Returns the full catalog record. Stashed remote payloads are a CLI
/// session concern and are not served here.
async fn handle_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlaceRecord>, AppError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("place not found: {}", id)))
}

// ============ POST /functions/generate-place-info ============

#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    query: String,
}

/// Handler for `POST /functions/generate-place-info`.
///
/// Invokes the remote lookup directly and relays its envelope. Lookup
/// failures (rate limits, unparseable replies, disabled gateway) come back
/// as `success: false` with HTTP 200; only transport errors map to 500.
async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<LookupResponse>), AppError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    match state.lookup.invoke(query).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(e) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(LookupResponse::failure(&e.to_string())),
        )),
    }
}
