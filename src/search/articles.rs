//! Article-record searcher with author boosting.
//!
//! When the filter names a person, the branch first resolves that name to a
//! record id and then adds an optional term clause on the author field. The
//! clause raises the score of that author's articles without excluding any
//! other article.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::error::SearchError;
use super::resolver::{BoostKey, BoostKeyResolver};
use super::traits::SourceSearcher;
use super::types::{ResultKind, SearchFilter, SearchResult};
use crate::config::{CollectionsConfig, SearchConfig};
use crate::gateway::{BoostClause, IndexQuery, TextIndexGateway};

const TITLE_FIELD: &str = "title";
const CONTENT_FIELD: &str = "content";

/// Searches article-records by title and body.
pub struct ArticleSearcher {
    gateway: Arc<dyn TextIndexGateway>,
    resolver: BoostKeyResolver,
    collection: String,
    author_field: String,
    author_boost: f64,
    tie_breaker: f64,
    limit: usize,
}

impl ArticleSearcher {
    pub fn new(
        gateway: Arc<dyn TextIndexGateway>,
        resolver: BoostKeyResolver,
        collections: &CollectionsConfig,
        search: &SearchConfig,
    ) -> Self {
        Self {
            gateway,
            resolver,
            collection: collections.articles.clone(),
            author_field: collections.author_field.clone(),
            author_boost: search.author_boost,
            tie_breaker: search.tie_breaker,
            limit: search.article_limit,
        }
    }

    fn build_query(&self, filter: &SearchFilter, key: Option<&BoostKey>) -> IndexQuery {
        let boost = key.map(|key| BoostClause {
            field: self.author_field.clone(),
            value: key.as_str().to_string(),
            weight: self.author_boost,
        });

        IndexQuery::new(
            self.collection.as_str(),
            &[TITLE_FIELD, CONTENT_FIELD],
            filter.query.as_str(),
        )
        .with_tie_breaker(self.tie_breaker)
        .with_boost(boost)
        .with_highlight(&[TITLE_FIELD, CONTENT_FIELD])
        .with_size(self.limit)
    }
}

#[async_trait]
impl SourceSearcher for ArticleSearcher {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchResult>, SearchError> {
        let key = match filter.boost_name() {
            Some(name) => self.resolver.resolve(name).await,
            None => None,
        };

        let query = self.build_query(filter, key.as_ref());

        let hits = self
            .gateway
            .search(&query)
            .await
            .map_err(|e| SearchError::unavailable(ResultKind::Article, e))?;

        debug!(
            collection = %self.collection,
            boosted = key.is_some(),
            hits = hits.len(),
            "Article search completed"
        );

        Ok(hits
            .iter()
            .map(|hit| SearchResult::from_hit(hit, ResultKind::Article, TITLE_FIELD, CONTENT_FIELD))
            .collect())
    }

    fn kind(&self) -> ResultKind {
        ResultKind::Article
    }
}
