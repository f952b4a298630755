//! People-record searcher.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::error::SearchError;
use super::traits::SourceSearcher;
use super::types::{ResultKind, SearchFilter, SearchResult};
use crate::config::{CollectionsConfig, SearchConfig};
use crate::gateway::{IndexQuery, TextIndexGateway};

const NAME_FIELD: &str = "name";
const BIO_FIELD: &str = "bio";

/// Searches people-records by name and biography.
pub struct PeopleSearcher {
    gateway: Arc<dyn TextIndexGateway>,
    collection: String,
    tie_breaker: f64,
    limit: usize,
}

impl PeopleSearcher {
    pub fn new(
        gateway: Arc<dyn TextIndexGateway>,
        collections: &CollectionsConfig,
        search: &SearchConfig,
    ) -> Self {
        Self {
            gateway,
            collection: collections.people.clone(),
            tie_breaker: search.tie_breaker,
            limit: search.people_limit,
        }
    }

    fn build_query(&self, filter: &SearchFilter) -> IndexQuery {
        IndexQuery::new(self.collection.as_str(), &[NAME_FIELD, BIO_FIELD], filter.query.as_str())
            .with_tie_breaker(self.tie_breaker)
            .with_highlight(&[NAME_FIELD, BIO_FIELD])
            .with_size(self.limit)
    }
}

#[async_trait]
impl SourceSearcher for PeopleSearcher {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchResult>, SearchError> {
        let query = self.build_query(filter);

        let hits = self
            .gateway
            .search(&query)
            .await
            .map_err(|e| SearchError::unavailable(ResultKind::Person, e))?;

        debug!(collection = %self.collection, hits = hits.len(), "People search completed");

        Ok(hits
            .iter()
            .map(|hit| SearchResult::from_hit(hit, ResultKind::Person, NAME_FIELD, BIO_FIELD))
            .collect())
    }

    fn kind(&self) -> ResultKind {
        ResultKind::Person
    }
}
