//! Uniform result model shared by every source searcher.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gateway::IndexHit;

/// Which collection a result came from.
///
/// Declaration order is the tie-break order used when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    /// A people-record
    #[serde(rename = "author")]
    Person,
    /// An article-record
    #[serde(rename = "news")]
    Article,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "author",
            Self::Article => "news",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to one federated search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    /// Display name of a person whose articles should be boosted
    pub boost_name: Option<String>,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            boost_name: None,
        }
    }

    /// Attach a boost name; blank names are treated as absent.
    pub fn with_boost_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.boost_name = name.map(Into::into).filter(|n: &String| !n.trim().is_empty());
        self
    }

    /// The boost name, if one is set and non-blank.
    pub fn boost_name(&self) -> Option<&str> {
        self.boost_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// One entry of the merged result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: ResultKind,
}

impl SearchResult {
    /// Project a raw index hit, preferring highlighted fragments for
    /// `title_field` and `content_field`.
    pub fn from_hit(hit: &IndexHit, kind: ResultKind, title_field: &str, content_field: &str) -> Self {
        Self {
            id: hit.id.clone(),
            title: value_with_highlight(hit, title_field),
            content: value_with_highlight(hit, content_field),
            score: hit.score,
            kind,
        }
    }
}

/// First highlighted fragment for `field`, or the raw source value.
pub fn value_with_highlight(hit: &IndexHit, field: &str) -> String {
    hit.highlight
        .get(field)
        .and_then(|fragments| fragments.first())
        .cloned()
        .unwrap_or_else(|| hit.field(field).to_string())
}
