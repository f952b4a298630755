//! In-process text index used by tests and local demos.
//!
//! Scoring mimics a `best_fields` multi-match: each field scores the number
//! of query-term occurrences it contains, the best field counts fully and the
//! remaining fields are scaled by the tie breaker. A boost clause adds its
//! weight to documents whose field equals the boost value.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::{GatewayError, IndexHit, IndexQuery, TextIndexGateway};

const PRE_TAG: &str = "<em>";
const POST_TAG: &str = "</em>";

#[derive(Debug, Clone)]
struct StoredDocument {
    id: String,
    fields: HashMap<String, String>,
}

/// Deterministic in-memory gateway.
#[derive(Default)]
pub struct InMemoryGateway {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    unavailable: RwLock<HashSet<String>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a document in `collection`.
    pub fn insert(&self, collection: &str, id: &str, fields: &[(&str, &str)]) {
        let doc = StoredDocument {
            id: id.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };

        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let docs = collections.entry(collection.to_string()).or_default();
        docs.retain(|d| d.id != id);
        docs.push(doc);
    }

    /// Builder form of [`InMemoryGateway::insert`].
    pub fn with_document(self, collection: &str, id: &str, fields: &[(&str, &str)]) -> Self {
        self.insert(collection, id, fields);
        self
    }

    /// Make every query against `collection` fail until restored.
    pub fn set_unavailable(&self, collection: &str, unavailable: bool) {
        let mut set = self.unavailable.write().unwrap_or_else(|e| e.into_inner());
        if unavailable {
            set.insert(collection.to_string());
        } else {
            set.remove(collection);
        }
    }

    /// Number of documents stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn score_document(doc: &StoredDocument, query: &IndexQuery, terms: &HashSet<String>) -> f64 {
        let field_scores: Vec<f64> = query
            .match_fields
            .iter()
            .map(|field| {
                doc.fields
                    .get(field)
                    .map_or(0, |text| tokenize(text).filter(|t| terms.contains(t)).count())
                    as f64
            })
            .collect();

        let best = field_scores.iter().copied().fold(0.0, f64::max);
        if best == 0.0 {
            return 0.0;
        }

        let rest: f64 = field_scores.iter().sum::<f64>() - best;
        let mut score = best + query.tie_breaker.unwrap_or(0.0) * rest;

        if let Some(boost) = &query.boost {
            if doc.fields.get(&boost.field) == Some(&boost.value) {
                score += boost.weight;
            }
        }

        score
    }
}

#[async_trait]
impl TextIndexGateway for InMemoryGateway {
    async fn search(&self, query: &IndexQuery) -> Result<Vec<IndexHit>, GatewayError> {
        if self
            .unavailable
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&query.collection)
        {
            return Err(GatewayError::Unavailable(query.collection.clone()));
        }

        let terms: HashSet<String> = tokenize(&query.query).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let Some(docs) = collections.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<IndexHit> = docs
            .iter()
            .filter_map(|doc| {
                let score = Self::score_document(doc, query, &terms);
                (score > 0.0).then(|| IndexHit {
                    id: doc.id.clone(),
                    score,
                    source: doc.fields.clone(),
                    highlight: highlight_fields(doc, &query.highlight_fields, &terms),
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(query.size);

        Ok(hits)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn highlight_fields(
    doc: &StoredDocument,
    fields: &[String],
    terms: &HashSet<String>,
) -> HashMap<String, Vec<String>> {
    fields
        .iter()
        .filter_map(|field| {
            let text = doc.fields.get(field)?;
            highlight_text(text, terms).map(|fragment| (field.clone(), vec![fragment]))
        })
        .collect()
}

/// Wrap every query term occurrence in `text` with highlight tags.
/// Returns `None` when nothing matched.
fn highlight_text(text: &str, terms: &HashSet<String>) -> Option<String> {
    let mut out = String::with_capacity(text.len() + 16);
    let mut matched = false;
    let mut word_start: Option<usize> = None;

    let mut flush = |out: &mut String, word: &str| {
        if terms.contains(&word.to_lowercase()) {
            matched = true;
            out.push_str(PRE_TAG);
            out.push_str(word);
            out.push_str(POST_TAG);
        } else {
            out.push_str(word);
        }
    };

    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if word_start.is_none() {
                word_start = Some(idx);
            }
        } else {
            if let Some(start) = word_start.take() {
                flush(&mut out, &text[start..idx]);
            }
            out.push(ch);
        }
    }
    if let Some(start) = word_start {
        flush(&mut out, &text[start..]);
    }

    matched.then_some(out)
}
