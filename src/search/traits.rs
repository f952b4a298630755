//! Source searcher trait.
//!
//! Every collection-specific searcher implements `SourceSearcher`, which lets
//! the aggregator treat people and article branches uniformly.

use async_trait::async_trait;

use super::error::SearchError;
use super::types::{ResultKind, SearchFilter, SearchResult};

/// One branch of a federated search.
#[async_trait]
pub trait SourceSearcher: Send + Sync {
    /// Search this source.
    ///
    /// Returns an empty list when nothing matches; an error only when the
    /// underlying index could not be queried.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchResult>, SearchError>;

    /// The kind of every result this searcher produces.
    fn kind(&self) -> ResultKind;
}
