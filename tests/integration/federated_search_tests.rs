use kindsearch::gateway::InMemoryGateway;
use kindsearch::search::{FederatedSearch, ResultKind, SearchError, SearchFilter};
use kindsearch::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::helpers::scripted_gateway::{Script, ScriptedGateway};
use crate::helpers::test_utils::{article_hit, person_hit};

fn newsroom() -> ScriptedGateway {
    ScriptedGateway::new()
        .with(
            "authors",
            Script::Hits(vec![person_hit("A1", "Jane Doe", "Covers elections", 4.2)]),
        )
        .with(
            "news",
            Script::Hits(vec![
                article_hit("N2", "Election recap", "Turnout was high", "A2", 3.5),
                article_hit("N1", "Election night", "Polls close at eight", "A1", 3.0),
            ]),
        )
}

fn search_over(gateway: Arc<ScriptedGateway>) -> FederatedSearch {
    FederatedSearch::from_gateway(gateway, &Config::default())
}

fn ids(results: &[kindsearch::search::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_boosted_author_articles_rank_first() {
    let gateway = Arc::new(newsroom());
    let search = search_over(Arc::clone(&gateway));

    let filter = SearchFilter::new("election").with_boost_name(Some("Jane Doe"));
    let results = search.search(&filter, &CancellationToken::new()).await.unwrap();

    assert_eq!(ids(&results), vec!["N1", "A1", "N2"]);
    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![5.0, 4.2, 3.5]);
    assert_eq!(results[0].kind, ResultKind::Article);
    assert_eq!(results[1].kind, ResultKind::Person);

    let article_queries = gateway.queries_for("news");
    assert_eq!(article_queries.len(), 1);
    let boost = article_queries[0].boost.as_ref().expect("boost clause");
    assert_eq!(boost.field, "authorID");
    assert_eq!(boost.value, "A1");
    assert_eq!(boost.weight, 2.0);
}

#[tokio::test]
async fn test_no_username_means_no_boost() {
    let gateway = Arc::new(newsroom());
    let search = search_over(Arc::clone(&gateway));

    let results = search
        .search(&SearchFilter::new("election"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["A1", "N2", "N1"]);
    // Only the people branch touched the people collection.
    assert_eq!(gateway.queries_for("authors").len(), 1);
    assert!(gateway.queries_for("news")[0].boost.is_none());
}

#[tokio::test]
async fn test_results_are_sorted_by_descending_score() {
    let search = search_over(Arc::new(newsroom()));

    let results = search
        .search(
            &SearchFilter::new("election").with_boost_name(Some("Jane Doe")),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_people_failure_returns_article_results() {
    let gateway = ScriptedGateway::new().with("authors", Script::Fail).with(
        "news",
        Script::Hits(vec![
            article_hit("N1", "Election night", "Polls", "A1", 3.0),
            article_hit("N2", "Election recap", "Turnout", "A2", 3.5),
        ]),
    );
    let search = search_over(Arc::new(gateway));

    // The boost lookup hits the failing people collection too; it must not matter.
    let filter = SearchFilter::new("election").with_boost_name(Some("Jane Doe"));
    let results = search.search(&filter, &CancellationToken::new()).await.unwrap();

    assert_eq!(ids(&results), vec!["N2", "N1"]);
    assert!(results.iter().all(|r| r.kind == ResultKind::Article));
}

#[tokio::test]
async fn test_article_failure_returns_people_results() {
    let gateway = ScriptedGateway::new()
        .with(
            "authors",
            Script::Hits(vec![person_hit("A1", "Jane Doe", "Reporter", 4.2)]),
        )
        .with("news", Script::Fail);
    let search = search_over(Arc::new(gateway));

    let results = search
        .search(&SearchFilter::new("jane"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["A1"]);
}

#[tokio::test]
async fn test_both_sources_failing_is_total_failure() {
    let gateway = ScriptedGateway::new()
        .with("authors", Script::Fail)
        .with("news", Script::Fail);
    let search = search_over(Arc::new(gateway));

    let err = search
        .search(&SearchFilter::new("election"), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        SearchError::TotalFailure { people, articles } => {
            assert!(matches!(
                *people,
                SearchError::SourceUnavailable { kind: ResultKind::Person, .. }
            ));
            assert!(matches!(
                *articles,
                SearchError::SourceUnavailable { kind: ResultKind::Article, .. }
            ));
        }
        other => panic!("expected total failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_matches_is_empty_success() {
    let search = search_over(Arc::new(ScriptedGateway::new()));

    let results = search
        .search(&SearchFilter::new("nothing"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_blank_query_is_rejected_before_any_io() {
    let gateway = Arc::new(newsroom());
    let search = search_over(Arc::clone(&gateway));

    let err = search
        .search(&SearchFilter::new("   "), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::InvalidArgument(_)));
    assert!(gateway.queries().is_empty());
}

#[tokio::test]
async fn test_timeout_keeps_finished_branch() {
    let gateway = ScriptedGateway::new().with("authors", Script::Hang).with(
        "news",
        Script::Hits(vec![article_hit("N1", "Election night", "Polls", "A1", 3.0)]),
    );
    let search = search_over(Arc::new(gateway));

    let results = search
        .search_with_timeout(&SearchFilter::new("election"), Duration::from_millis(50))
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["N1"]);
}

#[tokio::test]
async fn test_timeout_with_no_finished_branch_is_cancelled() {
    let gateway = ScriptedGateway::new()
        .with("authors", Script::Hang)
        .with("news", Script::Hang);
    let search = search_over(Arc::new(gateway));

    let err = search
        .search_with_timeout(&SearchFilter::new("election"), Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_cancelled_token_stops_search() {
    let gateway = ScriptedGateway::new()
        .with("authors", Script::Hang)
        .with("news", Script::Hang);
    let search = search_over(Arc::new(gateway));

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = search
        .search(&SearchFilter::new("election"), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Cancelled));
}

#[tokio::test]
async fn test_in_memory_backend_end_to_end() {
    let gateway = InMemoryGateway::new()
        .with_document("authors", "A1", &[("name", "Jane Doe"), ("bio", "Writes about climate")])
        .with_document("authors", "A2", &[("name", "John Smith"), ("bio", "Sports desk")])
        .with_document(
            "news",
            "N1",
            &[("title", "Climate summit"), ("content", "Leaders met"), ("authorID", "A2")],
        )
        .with_document(
            "news",
            "N2",
            &[("title", "Climate report"), ("content", "Warming continues"), ("authorID", "A1")],
        );
    let search = FederatedSearch::from_gateway(Arc::new(gateway), &Config::default());

    let unboosted = search
        .search(&SearchFilter::new("climate"), &CancellationToken::new())
        .await
        .unwrap();
    let boosted = search
        .search(
            &SearchFilter::new("climate").with_boost_name(Some("Jane Doe")),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    // Boosting reorders but never filters.
    assert_eq!(unboosted.len(), 3);
    assert_eq!(boosted.len(), 3);
    assert_eq!(boosted[0].id, "N2");
    assert_eq!(boosted[0].title, "<em>Climate</em> report");

    let n1 = |results: &[kindsearch::search::SearchResult]| {
        results.iter().find(|r| r.id == "N1").map(|r| r.score)
    };
    assert_eq!(n1(&unboosted), n1(&boosted));
}

#[tokio::test]
async fn test_results_serialize_with_wire_type_names() {
    let search = search_over(Arc::new(newsroom()));

    let results = search
        .search(&SearchFilter::new("election"), &CancellationToken::new())
        .await
        .unwrap();
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json[0]["type"], "author");
    assert_eq!(json[1]["type"], "news");
    assert_eq!(json[0]["id"], "A1");
    assert!(json[0]["score"].is_number());
}
