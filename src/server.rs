//! HTTP server for the course.
//!
//! Serves the catalog, resolved theory views, and lab submissions as JSON
//! so any front end can drive the course.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Status, version, loaded page count, AI availability |
//! | `GET`  | `/modules` | Dashboard: modules, section summaries, common mistakes |
//! | `GET`  | `/modules/{key}` | One module |
//! | `GET`  | `/modules/{key}/sections/{n}/theory` | Theory view with PDF excerpts |
//! | `GET`  | `/modules/{key}/sections/{n}/lab` | Lab definition and controls |
//! | `POST` | `/modules/{key}/sections/{n}/lab` | Run a lab |
//! | `POST` | `/retrieve` | Run the page retriever directly |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "module not found: Pivots" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! A failed lab run is not an HTTP error: `POST .../lab` always answers
//! `200` with `outcome.status` set to `ok` or `error`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use excel_lab_core::controls::Selections;
use excel_lab_core::pages::PageCollection;
use excel_lab_core::retrieve::{rank_pages, retrieve, PageScore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::{
    dashboard, find_module, find_section, CatalogError, DashboardView, LabView, ModuleView,
    TheoryView,
};
use crate::config::Config;
use crate::lab::{LabRun, LabRunner};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    pages: Arc<PageCollection>,
    runner: Arc<LabRunner>,
    /// Provider enabled and credential present at startup.
    ai_enabled: bool,
}

/// Starts the HTTP server on `[server].bind` and runs until terminated.
pub async fn run_server(
    config: &Config,
    pages: Arc<PageCollection>,
    runner: Arc<LabRunner>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let ai_enabled = config.llm.is_enabled() && config.llm.api_key().is_some();

    let state = AppState {
        config: Arc::new(config.clone()),
        pages,
        runner,
        ai_enabled,
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        bind = %bind_addr,
        pages = state.pages.len(),
        ai_enabled,
        "server listening"
    );
    println!("Course server listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/modules", get(handle_dashboard))
        .route("/modules/{key}", get(handle_module))
        .route("/modules/{key}/sections/{n}/theory", get(handle_theory))
        .route(
            "/modules/{key}/sections/{n}/lab",
            get(handle_lab_definition).post(handle_lab_run),
        )
        .route("/retrieve", post(handle_retrieve))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

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

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        not_found(err.to_string())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    pages: usize,
    ai_enabled: bool,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pages: state.pages.len(),
        ai_enabled: state.ai_enabled,
    })
}

// ============ Catalog ============

async fn handle_dashboard() -> Json<DashboardView> {
    Json(dashboard())
}

async fn handle_module(Path(key): Path<String>) -> Result<Json<ModuleView>, AppError> {
    let module = find_module(&key)?;
    Ok(Json(module.view()))
}

async fn handle_theory(
    State(state): State<AppState>,
    Path((key, n)): Path<(String, usize)>,
) -> Result<Json<TheoryView>, AppError> {
    let (module, section) = find_section(&key, n)?;
    Ok(Json(section.theory_view(module, &state.pages)))
}

async fn handle_lab_definition(
    Path((key, n)): Path<(String, usize)>,
) -> Result<Json<LabView>, AppError> {
    let (module, section) = find_section(&key, n)?;
    Ok(Json(section.lab_view(module)))
}

// ============ POST /modules/{key}/sections/{n}/lab ============

#[derive(Deserialize)]
struct LabRequest {
    context: String,
    #[serde(default)]
    selections: Selections,
}

/// Runs a lab. Submission failures are reported in `outcome`, not as
/// HTTP errors; only unknown modules or sections produce a 404.
async fn handle_lab_run(
    State(state): State<AppState>,
    Path((key, n)): Path<(String, usize)>,
    Json(req): Json<LabRequest>,
) -> Result<Json<LabRun>, AppError> {
    let (_, section) = find_section(&key, n)?;
    let run = state
        .runner
        .run(&section.lab, &req.selections, &req.context)
        .await;
    Ok(Json(run))
}

// ============ POST /retrieve ============

#[derive(Deserialize)]
struct RetrieveRequest {
    query: String,
    max_pages: Option<usize>,
    max_chars: Option<usize>,
    #[serde(default)]
    explain: bool,
}

#[derive(Serialize)]
struct RetrieveResponse {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<Vec<PageScore>>,
}

async fn handle_retrieve(
    State(state): State<AppState>,
    Json(req): Json<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>, AppError> {
    let mut params = state.config.retrieval.params();
    if let Some(max_pages) = req.max_pages {
        if max_pages == 0 {
            return Err(bad_request("max_pages must be >= 1"));
        }
        params.max_pages = max_pages;
    }
    if let Some(max_chars) = req.max_chars {
        if max_chars == 0 {
            return Err(bad_request("max_chars must be >= 1"));
        }
        params.max_chars = max_chars;
    }

    let pages = state.pages.pages();
    let scores = req.explain.then(|| rank_pages(&req.query, pages, &params));
    Ok(Json(RetrieveResponse {
        text: retrieve(&req.query, pages, &params),
        scores,
    }))
}
