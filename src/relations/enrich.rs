//! Per-record lookups of matching documents in the search index

use super::descriptor::Enrichment;
use super::error::{RelationQueryError, RelationResult};
use super::fetch::RelationRecord;
use crate::meilisearch::indexes::SearchDocument;
use crate::meilisearch::SearchStore;
use futures::future::try_join_all;

/// Looks up each graph record in the search index by its natural key
pub struct IndexEnricher<'a> {
    search: &'a dyn SearchStore,
    enrichment: Enrichment,
}

impl<'a> IndexEnricher<'a> {
    pub fn new(search: &'a dyn SearchStore, enrichment: Enrichment) -> Self {
        Self { search, enrichment }
    }

    /// One lookup per record, all in flight together.
    ///
    /// The output is aligned with `records`. The first failed lookup fails the
    /// whole step and the remaining lookups are dropped.
    pub async fn enrich(
        &self,
        records: &[RelationRecord],
    ) -> RelationResult<Vec<Vec<SearchDocument>>> {
        try_join_all(records.iter().map(|record| self.lookup(record))).await
    }

    async fn lookup(&self, record: &RelationRecord) -> RelationResult<Vec<SearchDocument>> {
        let Some(number) = record.key(self.enrichment.key_field) else {
            tracing::debug!(
                "Node {} has no '{}', skipping index lookup",
                record.node_id,
                self.enrichment.key_field
            );
            return Ok(Vec::new());
        };

        self.search
            .search_by_field(self.enrichment.index, self.enrichment.key_field, &number)
            .await
            .map_err(|source| {
                tracing::warn!(
                    "Index lookup in {} for {} failed: {:#}",
                    self.enrichment.index,
                    number,
                    source
                );
                RelationQueryError::Enrichment {
                    index: self.enrichment.index,
                    number: number.clone(),
                    source,
                }
            })
    }
}
