//! Trait abstraction for Meilisearch search operations

use super::indexes::SearchDocument;
use anyhow::Result;
use async_trait::async_trait;

/// Read-only lookups against the search index.
///
/// Index lifecycle (creation, settings, reindexing) is owned by ingestion and
/// is not part of this trait.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// All documents in `index` whose `field` equals `value`.
    ///
    /// No match yields an empty vector, never an error.
    async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<SearchDocument>>;
}
