//! Application state for the web server.
//!
//! This module defines the shared state that is accessible from all request handlers.

use crate::config::Config;
use crate::search::FederatedSearch;

/// Shared application state for the web server.
///
/// This state is cloned for each request handler; the searchers inside
/// `FederatedSearch` are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// The federated search engine
    pub search: FederatedSearch,
    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state.
    pub fn new(search: FederatedSearch, config: Config) -> Self {
        Self { search, config }
    }
}
