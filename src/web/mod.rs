//! HTTP API for the federated search.
//!
//! Exposes `GET /api/search`, plus `/health` and `/metrics`.
//!
//! # Example
//!
//! ```rust,ignore
//! use kindsearch::web::{AppState, WebServer};
//!
//! let server = WebServer::new(state);
//! server.start("0.0.0.0", 8080).await?;
//! ```

pub mod handlers;
pub mod routes;
pub mod state;

pub use state::AppState;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// HTTP server for the search API.
pub struct WebServer {
    /// Shared application state
    state: AppState,
}

impl WebServer {
    /// Create a new web server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with the CORS layer applied.
    pub fn router(self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.state).layer(cors)
    }

    /// Start the web server on `host:port`.
    ///
    /// Runs until Ctrl-C is received.
    pub async fn start(self, host: &str, port: u16) -> Result<()> {
        let addr = format!("{}:{}", host, port);
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        info!("Search API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .with_context(|| "Web server failed")?;

        info!("Search API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
