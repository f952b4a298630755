//! Route definitions for the web server.

use axum::{routing::get, Router};

use super::handlers;
use super::state::AppState;

/// Create the main router with all routes.
///
/// # Arguments
/// * `state` - The shared application state
///
/// # Returns
/// An Axum router configured with the search, health, and metrics endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(handlers::search))
        // Health and metrics
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}
