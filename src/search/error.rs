use thiserror::Error;

use super::types::ResultKind;
use crate::gateway::GatewayError;

/// Errors surfaced by the federated search core.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request was rejected before any source was queried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// One source could not be queried.
    #[error("{kind} source unavailable: {source}")]
    SourceUnavailable {
        kind: ResultKind,
        #[source]
        source: GatewayError,
    },

    /// The cancellation signal fired before the search finished.
    #[error("search cancelled")]
    Cancelled,

    /// Every source failed; no partial result exists.
    #[error("all sources failed (author: {people}; news: {articles})")]
    TotalFailure {
        people: Box<SearchError>,
        articles: Box<SearchError>,
    },
}

impl SearchError {
    pub(crate) fn unavailable(kind: ResultKind, source: GatewayError) -> Self {
        Self::SourceUnavailable { kind, source }
    }

    /// True when the error came from the cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
