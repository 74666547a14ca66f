//! Meilisearch client for document lookups

use super::indexes::{equality_filter, SearchDocument};
use anyhow::{Context, Result};
use meilisearch_sdk::{client::Client, search::SearchResults};

/// Default cap on documents returned by one lookup
pub const DEFAULT_HIT_LIMIT: usize = 20;

/// Client for Meilisearch operations
pub struct MeiliClient {
    client: Client,
    hit_limit: usize,
}

impl MeiliClient {
    /// Create a new Meilisearch client.
    ///
    /// Indexes are created and configured by ingestion; `number` must be a
    /// filterable attribute of every index looked up here.
    pub fn new(url: &str, api_key: &str, hit_limit: usize) -> Result<Self> {
        let client =
            Client::new(url, Some(api_key)).context("Failed to create Meilisearch client")?;
        Ok(Self {
            client,
            hit_limit: hit_limit.max(1),
        })
    }

    /// Documents in `index` whose `field` equals `value`
    pub async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<SearchDocument>> {
        let filter = equality_filter(field, value);
        let meili_index = self.client.index(index);

        let mut search = meili_index.search();
        search.with_filter(&filter).with_limit(self.hit_limit);

        let results: SearchResults<SearchDocument> = search.execute().await?;
        if reached_hit_limit(results.hits.len(), self.hit_limit) {
            tracing::debug!(
                index,
                filter = %filter,
                hit_limit = self.hit_limit,
                "Lookup returned the hit limit; further documents were dropped"
            );
        }
        Ok(results.hits.into_iter().map(|h| h.result).collect())
    }
}

/// Whether a lookup may have been cut off by `hit_limit`
fn reached_hit_limit(hits: usize, hit_limit: usize) -> bool {
    hits >= hit_limit
}
