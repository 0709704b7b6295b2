//! HTTP API for the portfolio frontend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/content/{collection}` | `experiences`, `projects`, `blogs`, `education`, or `case-studies` as a JSON array |
//! | `GET`  | `/content/case-studies/{id}` | A single case study |
//! | `POST` | `/search` | `{ "query": "..." }` → `{ "results": [...], "response": "..." }` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Invalid query" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! Content that cannot be read degrades to an empty array, and a failing
//! search delegate degrades to local keyword search; neither produces an
//! error response.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the site frontend can
//! be served from a different origin.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::content::{self, Collection};
use crate::models::{CaseStudy, SearchOutcome};
use crate::provider::{build_provider, SearchProvider};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    search: Arc<dyn SearchProvider>,
}

/// Starts the HTTP server with the provider chain from [`build_provider`].
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    run_server_with_provider(config, build_provider(config)).await
}

/// Starts the HTTP server answering `POST /search` from `search`.
pub async fn run_server_with_provider(
    config: &Config,
    search: Arc<dyn SearchProvider>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config, search);

    tracing::info!("portfolio API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the API router without binding a socket.
pub fn router(config: &Config, search: Arc<dyn SearchProvider>) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        search,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/content/{collection}", get(handle_collection))
        .route("/content/case-studies/{id}", get(handle_case_study))
        .route("/search", post(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
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

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// 500 with a generic message; the cause is logged, not returned.
fn internal(err: anyhow::Error) -> AppError {
    tracing::error!(error = %err, "request failed");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: "Internal server error".to_string(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /content/{collection} ============

/// Returns a collection as a JSON array. An unreadable collection is logged
/// and served as `[]`.
async fn handle_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let collection = Collection::from_name(&name)
        .ok_or_else(|| not_found(format!("unknown content collection: {}", name)))?;

    match content::load_collection(&state.config, collection) {
        Ok(value) => Ok(Json(value)),
        Err(e) => {
            tracing::warn!(collection = %name, error = %e, "failed to load collection");
            Ok(Json(Value::Array(Vec::new())))
        }
    }
}

// ============ GET /content/case-studies/{id} ============

async fn handle_case_study(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaseStudy>, AppError> {
    let study = match content::find_case_study(&state.config, &id) {
        Ok(study) => study,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load case studies");
            None
        }
    };
    study
        .map(Json)
        .ok_or_else(|| not_found(format!("case study not found: {}", id)))
}

// ============ POST /search ============

/// Extracts a usable query from the request body.
///
/// The body must be a JSON object whose `query` is a string with at least
/// one non-whitespace character.
fn extract_query(body: &Value) -> Result<&str, AppError> {
    match body.get("query").and_then(Value::as_str) {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(bad_request("Invalid query")),
    }
}

async fn handle_search(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchOutcome>, AppError> {
    let Json(body) = body.map_err(|e| bad_request(format!("Invalid request body: {}", e)))?;
    let query = extract_query(&body)?;

    let outcome = state.search.search(query).await.map_err(internal)?;
    tracing::debug!(
        provider = state.search.name(),
        results = outcome.results.len(),
        "search served"
    );
    Ok(Json(outcome))
}
