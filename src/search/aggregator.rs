//! Federated search across the people and article collections.
//!
//! Both branches run concurrently and are always joined. A branch failure
//! degrades the answer to the other branch's results; only a failure of both
//! branches fails the search. Scores are taken as-is from each source and are
//! assumed comparable across collections; the merge does not renormalise them.

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use super::articles::ArticleSearcher;
use super::error::SearchError;
use super::people::PeopleSearcher;
use super::resolver::BoostKeyResolver;
use super::traits::SourceSearcher;
use super::types::{SearchFilter, SearchResult};
use crate::config::Config;
use crate::gateway::TextIndexGateway;
use crate::metrics;

/// Orchestrates the per-collection searchers and merges their results.
#[derive(Clone)]
pub struct FederatedSearch {
    people: Arc<dyn SourceSearcher>,
    articles: Arc<dyn SourceSearcher>,
}

impl FederatedSearch {
    /// Create an aggregator over two arbitrary source searchers.
    pub fn new(people: Arc<dyn SourceSearcher>, articles: Arc<dyn SourceSearcher>) -> Self {
        Self { people, articles }
    }

    /// Wire the standard people and article searchers onto one gateway.
    pub fn from_gateway(gateway: Arc<dyn TextIndexGateway>, config: &Config) -> Self {
        let resolver = BoostKeyResolver::new(Arc::clone(&gateway), config.collections.people.as_str());
        let people = PeopleSearcher::new(Arc::clone(&gateway), &config.collections, &config.search);
        let articles = ArticleSearcher::new(gateway, resolver, &config.collections, &config.search);

        Self::new(Arc::new(people), Arc::new(articles))
    }

    /// Run a federated search.
    ///
    /// `cancel` aborts in-flight branch queries; both branches are still
    /// joined before this returns.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if filter.query.trim().is_empty() {
            return Err(SearchError::InvalidArgument(
                "search query must not be empty".to_string(),
            ));
        }

        let start = Instant::now();
        metrics::SEARCH_REQUESTS.inc();

        let span = info_span!(
            "federated_search",
            query = %filter.query,
            boost_name = filter.boost_name().unwrap_or_default()
        );

        let people = run_branch(self.people.search(filter), cancel)
            .instrument(info_span!(parent: &span, "branch", source = %self.people.kind()));
        let articles = run_branch(self.articles.search(filter), cancel)
            .instrument(info_span!(parent: &span, "branch", source = %self.articles.kind()));

        let (people, articles) = tokio::join!(people, articles);

        span.in_scope(|| {
            let outcome = merge_outcomes(people, articles);

            metrics::SEARCH_LATENCY.observe(start.elapsed().as_secs_f64());
            match &outcome {
                Ok(results) => {
                    metrics::SEARCH_RESULTS.observe(results.len() as f64);
                    info!(
                        results = results.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Federated search completed"
                    );
                }
                Err(e) => {
                    metrics::SEARCH_FAILURES.inc();
                    warn!(error = %e, "Federated search failed");
                }
            }
            outcome
        })
    }

    /// Run a federated search that is cancelled once `timeout` elapses.
    pub async fn search_with_timeout(
        &self,
        filter: &SearchFilter,
        timeout: Duration,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let cancel = CancellationToken::new();
        let deadline = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            }
        });

        let result = self.search(filter, &cancel).await;
        deadline.abort();
        result
    }
}

/// Race one branch against the cancellation signal. Losing the race drops
/// the branch future, which aborts any request it had in flight.
async fn run_branch<F>(branch: F, cancel: &CancellationToken) -> Result<Vec<SearchResult>, SearchError>
where
    F: Future<Output = Result<Vec<SearchResult>, SearchError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SearchError::Cancelled),
        result = branch => result,
    }
}

/// Combine both branch outcomes into the final answer.
fn merge_outcomes(
    people: Result<Vec<SearchResult>, SearchError>,
    articles: Result<Vec<SearchResult>, SearchError>,
) -> Result<Vec<SearchResult>, SearchError> {
    let mut merged = match (people, articles) {
        (Ok(mut people), Ok(articles)) => {
            people.extend(articles);
            people
        }
        (Ok(people), Err(e)) | (Err(e), Ok(people)) => {
            record_branch_failure(&e);
            people
        }
        (Err(people), Err(articles)) => {
            record_branch_failure(&people);
            record_branch_failure(&articles);
            if people.is_cancelled() || articles.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            return Err(SearchError::TotalFailure {
                people: Box::new(people),
                articles: Box::new(articles),
            });
        }
    };

    sort_results(&mut merged);
    Ok(merged)
}

fn record_branch_failure(error: &SearchError) {
    match error {
        SearchError::SourceUnavailable { kind, .. } => {
            metrics::SOURCE_FAILURES.with_label_values(&[kind.as_str()]).inc();
            warn!(source = %kind, error = %error, "Source failed, returning partial results");
        }
        _ => warn!(error = %error, "Source branch did not complete"),
    }
}

/// Order by score descending; ties go people first, then by id.
pub fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(compare_results);
}

fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| a.id.cmp(&b.id))
}
