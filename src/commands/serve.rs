//! `kindsearch serve`: run the HTTP search API.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::gateway::ElasticsearchGateway;
use crate::search::FederatedSearch;
use crate::web::{AppState, WebServer};
use crate::Config;

/// Start the search API.
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `port` - Optional port overriding the configured one
pub async fn run(config: Config, port: Option<u16>) -> Result<()> {
    let gateway = ElasticsearchGateway::new(&config.gateway)
        .context("Failed to create Elasticsearch client")?;

    info!(
        url = gateway.base_url(),
        people = %config.collections.people,
        articles = %config.collections.articles,
        "Using Elasticsearch gateway"
    );

    let search = FederatedSearch::from_gateway(Arc::new(gateway), &config);
    let host = config.server.host.clone();
    let port = port.unwrap_or(config.server.port);

    let server = WebServer::new(AppState::new(search, config));
    server.start(&host, port).await
}
