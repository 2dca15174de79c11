//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /receipts/process     body: receipt JSON  → 200 {"id": "..."}    │
//! │  GET  /receipts/{id}/points                     → 200 {"points": N}    │
//! │  GET  /health                                   → 200 "OK" / 503       │
//! │                                                                         │
//! │  Any other method on a receipt route            → 405                  │
//! │  Any other path                                 → 404                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info, warn};

use receipt_core::Receipt;

use crate::error::ApiError;
use crate::service::ReceiptService;

/// Route accepting new receipts.
pub const PROCESS_ROUTE: &str = "/receipts/process";

/// Route returning the points of a stored receipt.
pub const POINTS_ROUTE: &str = "/receipts/{id}/points";

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: ReceiptService,
}

impl AppState {
    pub fn new(service: ReceiptService) -> Self {
        AppState { service }
    }
}

/// Body of a successful submission.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub id: String,
}

/// Body of a successful lookup.
#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub points: i64,
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            PROCESS_ROUTE,
            post(process_receipt).fallback(|| async {
                ApiError::method_not_allowed(PROCESS_ROUTE, "POST")
            }),
        )
        .route(
            POINTS_ROUTE,
            get(receipt_points).fallback(|| async {
                ApiError::method_not_allowed(POINTS_ROUTE, "GET")
            }),
        )
        .route("/health", get(health_handler))
        .fallback(unknown_route)
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Decodes, validates and stores a receipt.
///
/// The body is decoded regardless of its declared content type. A body that
/// is not a receipt gets the same 400 as one that fails validation.
async fn process_receipt(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProcessResponse>, ApiError> {
    let receipt: Receipt = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Undecodable receipt body");
        ApiError::invalid_receipt()
    })?;

    let id = state.service.submit(receipt).await?;
    info!(id = %id, "Receipt processed");

    Ok(Json(ProcessResponse { id }))
}

/// Returns the points for a stored receipt.
async fn receipt_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "A valid id must be specified, cannot be an empty string",
        ));
    }

    let points = state.service.lookup(&id).await?;
    Ok(Json(PointsResponse { points }))
}

/// Health check endpoint.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.service.database().health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}

async fn unknown_route(uri: Uri) -> ApiError {
    debug!(path = %uri.path(), "No route");
    ApiError::new(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}
