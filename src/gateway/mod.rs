//! Text index gateway: the boundary between the search core and the
//! external full-text engine.
//!
//! This module contains:
//! - `TextIndexGateway` - the async capability every backend implements
//! - `elasticsearch` - HTTP backend speaking the Elasticsearch `_search` API
//! - `memory` - deterministic in-process backend for tests and local demos

pub mod elasticsearch;
pub mod memory;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use elasticsearch::ElasticsearchGateway;
pub use memory::InMemoryGateway;

/// Errors raised while talking to the text index.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a non-success status.
    #[error("index returned {status} for collection '{collection}': {body}")]
    Status {
        collection: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The collection is not reachable.
    #[error("collection '{0}' is unavailable")]
    Unavailable(String),
}

/// Optional additive boost: documents whose `field` equals `value`
/// get their relevance raised by `weight`. Non-matching documents stay eligible.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostClause {
    pub field: String,
    pub value: String,
    pub weight: f64,
}

/// A multi-field full-text query against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    /// Collection (index) name
    pub collection: String,
    /// Fields the query text is matched against
    pub match_fields: Vec<String>,
    /// Free-text query
    pub query: String,
    /// Weight given to non-best field scores; `None` means best field only
    pub tie_breaker: Option<f64>,
    pub boost: Option<BoostClause>,
    /// Fields to return highlighted fragments for
    pub highlight_fields: Vec<String>,
    /// Maximum number of hits
    pub size: usize,
}

impl IndexQuery {
    /// Create a query with no boost, no highlighting, and best-field scoring.
    pub fn new(collection: impl Into<String>, match_fields: &[&str], query: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            match_fields: match_fields.iter().map(|f| f.to_string()).collect(),
            query: query.into(),
            tie_breaker: None,
            boost: None,
            highlight_fields: Vec::new(),
            size: 10,
        }
    }

    pub fn with_tie_breaker(mut self, tie_breaker: f64) -> Self {
        self.tie_breaker = Some(tie_breaker);
        self
    }

    pub fn with_boost(mut self, boost: Option<BoostClause>) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_highlight(mut self, fields: &[&str]) -> Self {
        self.highlight_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

/// One raw hit as returned by the engine, ordered by relevance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub score: f64,
    /// String-valued source fields
    pub source: HashMap<String, String>,
    /// Highlighted fragments per field; empty when none were produced
    pub highlight: HashMap<String, Vec<String>>,
}

impl IndexHit {
    /// Raw source value for `field`, or the empty string.
    pub fn field(&self, field: &str) -> &str {
        self.source.get(field).map(String::as_str).unwrap_or_default()
    }
}

/// Capability to run a full-text query against an external index.
#[async_trait]
pub trait TextIndexGateway: Send + Sync {
    /// Execute `query` and return hits ordered by descending relevance.
    async fn search(&self, query: &IndexQuery) -> Result<Vec<IndexHit>, GatewayError>;

    /// Backend identifier for logging.
    fn backend_name(&self) -> &'static str;
}
