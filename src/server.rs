//! HTTP API server.
//!
//! Exposes the analysis, summarization, and history operations as a JSON
//! HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/analyze` | Composite sentiment analysis of a text |
//! | `POST` | `/summarize` | Summarize a text (pass-through when short) |
//! | `POST` | `/save-history` | Append an analysis record to the history log |
//! | `GET` | `/get-history` | List all history entries |
//! | `DELETE` | `/delete-entry` | Delete history entries by timestamp |
//! | `GET` | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry a flat JSON body:
//!
//! ```json
//! { "error": "No text provided" }
//! ```
//!
//! Validation errors map to 400, a missing history file on delete to 404,
//! and model or storage failures to 500. Model failures are not retried
//! and never produce a partial result.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::analyze;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::inference::InferenceStack;
use crate::models::{AnalysisResult, HistoryEntry, SaveHistoryRequest, SummaryResult};
use crate::summarize;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
struct AppState {
    /// Model adapters (classifier, segmenter, summarizer).
    inference: InferenceStack,
    /// The shared history log.
    history: Arc<HistoryStore>,
}

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and registers all
/// route handlers. The server runs indefinitely until the process is
/// terminated.
///
/// # Errors
///
/// Returns an error if the inference backend cannot be constructed or
/// binding fails.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let inference = InferenceStack::from_config(&config.inference)?;
    let history = Arc::new(HistoryStore::new(&config.history.path));

    let state = AppState { inference, history };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/summarize", post(handle_summarize))
        .route("/save-history", post(handle_save_history))
        .route("/get-history", get(handle_get_history))
        .route("/delete-entry", delete(handle_delete_entry))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    tracing::info!(
        bind = %config.server.bind,
        provider = %config.inference.provider,
        history = %config.history.path.display(),
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body: `{"error": "<message>"}`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        message: message.into(),
    }
}

/// Constructs a 500 error for model and storage failures.
fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

/// Maps library errors to the most appropriate HTTP status code.
/// Validation errors raised before any model or storage call become
/// client errors; everything else (unreachable model, corrupted history
/// file) is an internal error.
fn classify_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();

    if msg.contains("No text provided") || msg.contains("Missing timestamp") {
        bad_request(msg)
    } else if msg.contains("not found") {
        not_found(msg)
    } else {
        tracing::warn!(error = %msg, "Request failed");
        internal_error(msg)
    }
}

// ============ POST /analyze ============

/// JSON request body for `/analyze` and `/summarize`. A missing `text`
/// field is treated as empty and rejected by validation.
#[derive(Deserialize)]
struct TextRequest {
    #[serde(default)]
    text: String,
}

/// Handler for `POST /analyze`.
///
/// Runs the full analysis: whole-text classification, segmentation, and
/// per-sentence classification. Returns 400 when the text is empty or
/// missing, 500 when a model call fails.
async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = analyze::analyze_text(&state.inference, &req.text)
        .await
        .map_err(classify_error)?;

    Ok(Json(result))
}

// ============ POST /summarize ============

/// Handler for `POST /summarize`.
///
/// Returns the summarizer's output for long text and the original text
/// verbatim for short text.
async fn handle_summarize(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SummaryResult>, AppError> {
    let result = summarize::summarize_text(state.inference.summarizer.as_ref(), &req.text)
        .await
        .map_err(classify_error)?;

    Ok(Json(result))
}

// ============ History endpoints ============

/// JSON response body for mutation acknowledgements.
#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

/// Handler for `POST /save-history`.
///
/// Stamps the entry with the current local time and appends it to the
/// log. Always succeeds once the payload parses.
async fn handle_save_history(
    State(state): State<AppState>,
    Json(payload): Json<SaveHistoryRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.history.save(payload).map_err(classify_error)?;

    Ok(Json(MessageResponse {
        message: "History saved successfully".to_string(),
    }))
}

/// Handler for `GET /get-history`.
///
/// Returns the full log in append order; an empty array when no history
/// file exists yet.
async fn handle_get_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let log = state.history.list().map_err(classify_error)?;
    Ok(Json(log))
}

/// JSON request body for `DELETE /delete-entry`.
#[derive(Deserialize)]
struct DeleteRequest {
    #[serde(default)]
    timestamp: Option<String>,
}

/// Handler for `DELETE /delete-entry`.
///
/// Removes every entry whose timestamp matches. Returns 400 when the
/// timestamp is missing or empty, 404 when no history file exists. A
/// timestamp matching nothing still succeeds.
async fn handle_delete_entry(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let timestamp = match req.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Err(bad_request("Missing timestamp")),
    };

    state.history.delete(&timestamp).map_err(classify_error)?;

    Ok(Json(MessageResponse {
        message: "Entry deleted successfully".to_string(),
    }))
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
///
/// Returns a simple health check response with the server status and
/// version. Used by load balancers and monitoring tools.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
