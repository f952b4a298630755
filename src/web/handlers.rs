//! HTTP request handlers.
//!
//! This module contains the API endpoint handlers for the search service.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::state::AppState;
use crate::metrics;
use crate::search::{SearchError, SearchFilter};

/// Query string of `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// The search query string
    pub q: Option<String>,
    /// Display name of the person whose articles get boosted
    pub username: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Version
    pub version: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": message.into()
        })),
    )
        .into_response()
}

/// Handle federated search requests.
///
/// GET /api/search?q=...&username=...
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let start = Instant::now();

    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        warn!("Search query is empty");
        return error_response(StatusCode::BAD_REQUEST, "Search query is required");
    };

    let username = params.username.filter(|u| !u.trim().is_empty());
    if state.config.server.require_username && username.is_none() {
        warn!("Username is empty");
        return error_response(StatusCode::BAD_REQUEST, "Username is required");
    }

    info!(
        query = %query,
        username = username.as_deref().unwrap_or_default(),
        "Processing search request"
    );

    let filter = SearchFilter::new(query).with_boost_name(username);
    let timeout = Duration::from_millis(state.config.search.timeout_ms);

    match state.search.search_with_timeout(&filter, timeout).await {
        Ok(results) => {
            info!(
                results = results.len(),
                took_ms = start.elapsed().as_millis() as u64,
                "Search completed"
            );
            Json(results).into_response()
        }
        Err(e @ SearchError::InvalidArgument(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(SearchError::Cancelled) => {
            error!(timeout_ms = state.config.search.timeout_ms, "Search timed out");
            error_response(StatusCode::GATEWAY_TIMEOUT, "Search timed out")
        }
        Err(e) => {
            error!(error = %e, "Search failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Search failed: {}", e),
            )
        }
    }
}

/// Health check endpoint.
///
/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Prometheus metrics endpoint.
///
/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    let output = metrics::gather_metrics();
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], output)
}
