//! Elasticsearch backend for the text index gateway.
//!
//! Queries are sent as `POST {url}/{collection}/_search` with a typed body:
//! a `bool` query whose `must` clause is a `best_fields` multi-match and
//! whose optional `should` clause carries the author boost term.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{GatewayError, IndexHit, IndexQuery, TextIndexGateway};
use crate::config::GatewayConfig;

/// HTTP gateway to an Elasticsearch cluster.
#[derive(Clone)]
pub struct ElasticsearchGateway {
    client: Client,
    base_url: String,
    pre_tag: String,
    post_tag: String,
}

impl ElasticsearchGateway {
    /// Create a gateway from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            pre_tag: config.pre_tag.clone(),
            post_tag: config.post_tag.clone(),
        })
    }

    /// Base URL of the cluster, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, collection: &str) -> String {
        format!("{}/{}/_search", self.base_url, collection)
    }

    fn build_body<'a>(&'a self, query: &'a IndexQuery) -> SearchBody<'a> {
        let should = query
            .boost
            .iter()
            .map(|boost| {
                let mut term = BTreeMap::new();
                term.insert(
                    boost.field.as_str(),
                    TermValue {
                        value: &boost.value,
                        boost: boost.weight,
                    },
                );
                TermClause { term }
            })
            .collect();

        let highlight = if query.highlight_fields.is_empty() {
            None
        } else {
            Some(HighlightBody {
                fields: query
                    .highlight_fields
                    .iter()
                    .map(|f| (f.as_str(), HighlightField {}))
                    .collect(),
                pre_tags: [self.pre_tag.as_str()],
                post_tags: [self.post_tag.as_str()],
            })
        };

        SearchBody {
            size: query.size,
            query: QueryBody {
                bool: BoolQuery {
                    must: MultiMatchClause {
                        multi_match: MultiMatch {
                            query: &query.query,
                            fields: &query.match_fields,
                            kind: "best_fields",
                            tie_breaker: query.tie_breaker,
                        },
                    },
                    should,
                },
            },
            highlight,
        }
    }
}

#[async_trait]
impl TextIndexGateway for ElasticsearchGateway {
    async fn search(&self, query: &IndexQuery) -> Result<Vec<IndexHit>, GatewayError> {
        let start = Instant::now();
        let body = self.build_body(query);

        let response = self
            .client
            .post(self.search_url(&query.collection))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                collection: query.collection.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: SearchResponseBody = serde_json::from_slice(&bytes)?;
        let hits: Vec<IndexHit> = parsed.hits.hits.into_iter().map(IndexHit::from).collect();

        debug!(
            collection = %query.collection,
            hits = hits.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Index query completed"
        );

        Ok(hits)
    }

    fn backend_name(&self) -> &'static str {
        "elasticsearch"
    }
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    size: usize,
    query: QueryBody<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlight: Option<HighlightBody<'a>>,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    bool: BoolQuery<'a>,
}

#[derive(Debug, Serialize)]
struct BoolQuery<'a> {
    must: MultiMatchClause<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    should: Vec<TermClause<'a>>,
}

#[derive(Debug, Serialize)]
struct MultiMatchClause<'a> {
    multi_match: MultiMatch<'a>,
}

#[derive(Debug, Serialize)]
struct MultiMatch<'a> {
    query: &'a str,
    fields: &'a [String],
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tie_breaker: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TermClause<'a> {
    term: BTreeMap<&'a str, TermValue<'a>>,
}

#[derive(Debug, Serialize)]
struct TermValue<'a> {
    value: &'a str,
    boost: f64,
}

#[derive(Debug, Serialize)]
struct HighlightBody<'a> {
    fields: BTreeMap<&'a str, HighlightField>,
    pre_tags: [&'a str; 1],
    post_tags: [&'a str; 1],
}

#[derive(Debug, Serialize)]
struct HighlightField {}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: serde_json::Map<String, Value>,
    #[serde(default)]
    highlight: HashMap<String, Vec<String>>,
}

impl From<RawHit> for IndexHit {
    fn from(raw: RawHit) -> Self {
        let source = raw
            .source
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();

        Self {
            id: raw.id,
            score: raw.score.unwrap_or_default(),
            source,
            highlight: raw.highlight,
        }
    }
}
