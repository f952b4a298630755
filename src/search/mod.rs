//! Federated search core.
//!
//! This module contains:
//! - `types` - uniform `SearchResult`, `SearchFilter`, and highlight extraction
//! - `traits` - the `SourceSearcher` trait implemented by each collection branch
//! - `resolver` - boost key resolution from a person's display name
//! - `people` / `articles` - the two collection-specific searchers
//! - `aggregator` - concurrent fan-out, partial-failure handling, and merge

pub mod aggregator;
pub mod articles;
pub mod error;
pub mod people;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use aggregator::{sort_results, FederatedSearch};
pub use articles::ArticleSearcher;
pub use error::SearchError;
pub use people::PeopleSearcher;
pub use resolver::{BoostKey, BoostKeyResolver};
pub use traits::SourceSearcher;
pub use types::{value_with_highlight, ResultKind, SearchFilter, SearchResult};
