use kindsearch::config::GatewayConfig;
use kindsearch::gateway::{
    BoostClause, ElasticsearchGateway, GatewayError, IndexQuery, TextIndexGateway,
};
use kindsearch::search::{FederatedSearch, ResultKind, SearchFilter};
use kindsearch::Config;
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn gateway_for(url: String) -> ElasticsearchGateway {
    ElasticsearchGateway::new(&GatewayConfig {
        url,
        ..GatewayConfig::default()
    })
    .unwrap()
}

fn hits_body(hits: serde_json::Value) -> String {
    json!({ "took": 1, "hits": { "total": { "value": 1 }, "hits": hits } }).to_string()
}

#[tokio::test]
async fn test_search_posts_query_and_decodes_hits() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/news/_search")
        .match_body(Matcher::PartialJson(json!({
            "size": 1000,
            "query": {
                "bool": {
                    "must": {
                        "multi_match": {
                            "query": "election",
                            "fields": ["title", "content"],
                            "type": "best_fields",
                            "tie_breaker": 0.3
                        }
                    },
                    "should": [{ "term": { "authorID": { "value": "A1", "boost": 2.0 } } }]
                }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(hits_body(json!([{
            "_id": "N1",
            "_score": 5.0,
            "_source": { "title": "Election night", "content": "Polls close", "authorID": "A1", "views": 10 },
            "highlight": { "title": ["<em>Election</em> night"] }
        }])))
        .create_async()
        .await;

    let gateway = gateway_for(server.url());
    let query = IndexQuery::new("news", &["title", "content"], "election")
        .with_tie_breaker(0.3)
        .with_boost(Some(BoostClause {
            field: "authorID".to_string(),
            value: "A1".to_string(),
            weight: 2.0,
        }))
        .with_highlight(&["title", "content"])
        .with_size(1000);

    let hits = gateway.search(&query).await.unwrap();
    mock.assert_async().await;

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "N1");
    assert_eq!(hits[0].score, 5.0);
    assert_eq!(hits[0].field("title"), "Election night");
    // Non-string source values are dropped.
    assert_eq!(hits[0].field("views"), "");
    assert_eq!(hits[0].highlight["title"], vec!["<em>Election</em> night"]);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/authors/_search")
        .with_status(503)
        .with_body("cluster unavailable")
        .create_async()
        .await;

    let gateway = gateway_for(server.url());
    let err = gateway
        .search(&IndexQuery::new("authors", &["name"], "jane"))
        .await
        .unwrap_err();

    match err {
        GatewayError::Status { collection, status, body } => {
            assert_eq!(collection, "authors");
            assert_eq!(status, 503);
            assert_eq!(body, "cluster unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_response_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/authors/_search")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let gateway = gateway_for(server.url());
    let err = gateway
        .search(&IndexQuery::new("authors", &["name"], "jane"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_cluster_is_transport_error() {
    let gateway = gateway_for("http://127.0.0.1:1".to_string());
    let err = gateway
        .search(&IndexQuery::new("authors", &["name"], "jane"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
}

#[tokio::test]
async fn test_federated_search_over_http_degrades_on_article_outage() {
    let mut server = mockito::Server::new_async().await;
    let _people = server
        .mock("POST", "/authors/_search")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(hits_body(json!([{
            "_id": "A1",
            "_score": 4.2,
            "_source": { "name": "Jane Doe", "bio": "Reporter" }
        }])))
        .create_async()
        .await;
    let _articles = server
        .mock("POST", "/news/_search")
        .with_status(500)
        .create_async()
        .await;

    let mut config = Config::default();
    config.gateway.url = server.url();
    let gateway = ElasticsearchGateway::new(&config.gateway).unwrap();
    let search = FederatedSearch::from_gateway(Arc::new(gateway), &config);

    let results = search
        .search(&SearchFilter::new("jane"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "A1");
    assert_eq!(results[0].kind, ResultKind::Person);
    assert_eq!(results[0].title, "Jane Doe");
    assert_eq!(results[0].content, "Reporter");
}
