//! Boost key resolution: display name -> person record id.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::gateway::{IndexQuery, TextIndexGateway};
use crate::metrics;

/// Field of the people collection matched against the boost name.
pub const NAME_FIELD: &str = "name";

/// Stable identifier used to boost one author's articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostKey(String);

impl BoostKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves a person's display name to their record id.
#[derive(Clone)]
pub struct BoostKeyResolver {
    gateway: Arc<dyn TextIndexGateway>,
    collection: String,
}

impl BoostKeyResolver {
    pub fn new(gateway: Arc<dyn TextIndexGateway>, collection: impl Into<String>) -> Self {
        Self {
            gateway,
            collection: collection.into(),
        }
    }

    /// Best-matching person id for `name`.
    ///
    /// Never fails: a miss or a gateway error yields `None` and the caller
    /// proceeds without a boost.
    pub async fn resolve(&self, name: &str) -> Option<BoostKey> {
        let query = IndexQuery::new(self.collection.as_str(), &[NAME_FIELD], name).with_size(1);

        match self.gateway.search(&query).await {
            Ok(hits) => match hits.into_iter().next().filter(|hit| !hit.id.is_empty()) {
                Some(hit) => {
                    debug!(boost_name = name, key = %hit.id, "Resolved boost key");
                    metrics::BOOST_RESOLUTIONS.with_label_values(&["hit"]).inc();
                    Some(BoostKey(hit.id))
                }
                None => {
                    debug!(boost_name = name, "No person matches boost name");
                    metrics::BOOST_RESOLUTIONS.with_label_values(&["miss"]).inc();
                    None
                }
            },
            Err(e) => {
                warn!(boost_name = name, error = %e, "Boost key lookup failed, continuing unboosted");
                metrics::BOOST_RESOLUTIONS.with_label_values(&["error"]).inc();
                None
            }
        }
    }
}
