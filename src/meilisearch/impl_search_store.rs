//! SearchStore trait implementation for MeiliClient
//!
//! Each trait method delegates directly to the corresponding inherent method
//! on `MeiliClient`.

use anyhow::Result;
use async_trait::async_trait;

use super::client::MeiliClient;
use super::indexes::SearchDocument;
use super::traits::SearchStore;

#[async_trait]
impl SearchStore for MeiliClient {
    async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<SearchDocument>> {
        self.search_by_field(index, field, value).await
    }
}
