//! Public facade over the relation query pipeline

use super::descriptor::{RelationDescriptor, RelationKind};
use super::enrich::IndexEnricher;
use super::error::RelationResult;
use super::fetch::ConcurrentFetchCoordinator;
use super::merge::{RelationPage, ResultMerger};
use super::planner::{RelationFilter, RelationQueryPlanner};
use crate::meilisearch::SearchStore;
use crate::neo4j::GraphStore;
use std::sync::Arc;
use tracing::Instrument;

/// Answers citation relation queries against the graph and the search index.
///
/// Stateless: every call plans, fetches, enriches and merges from scratch.
#[derive(Clone)]
pub struct RelationQueryService {
    graph: Arc<dyn GraphStore>,
    search: Arc<dyn SearchStore>,
}

impl RelationQueryService {
    pub fn new(graph: Arc<dyn GraphStore>, search: Arc<dyn SearchStore>) -> Self {
        Self { graph, search }
    }

    /// Page of `kind` results for `filter`, with the filter's distinct total
    pub async fn query(
        &self,
        kind: RelationKind,
        filter: &RelationFilter,
    ) -> RelationResult<RelationPage> {
        let span = tracing::info_span!(
            "relation_query",
            relation = %kind,
            subject_id = %filter.subject_id,
            skip = filter.skip,
            limit = filter.limit,
            has_search = filter.search.as_deref().is_some_and(|s| !s.trim().is_empty()),
        );

        async {
            let result = self.run_query(kind.descriptor(), filter).await;
            match &result {
                Ok(page) => tracing::debug!(
                    total = page.total,
                    items = page.items.len(),
                    "relation query done"
                ),
                Err(e) => tracing::warn!(error = %e, "relation query failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Unfiltered, unpaginated count of `kind` results for `subject_id`
    pub async fn count(&self, kind: RelationKind, subject_id: &str) -> RelationResult<u64> {
        let span =
            tracing::info_span!("relation_count", relation = %kind, subject_id = %subject_id);

        async {
            let plan = RelationQueryPlanner::count_only(kind.descriptor(), subject_id);
            let result = ConcurrentFetchCoordinator::new(self.graph.as_ref())
                .count(&plan)
                .await;
            match &result {
                Ok(total) => tracing::debug!(total, "relation count done"),
                Err(e) => tracing::warn!(error = %e, "relation count failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_query(
        &self,
        descriptor: &'static RelationDescriptor,
        filter: &RelationFilter,
    ) -> RelationResult<RelationPage> {
        let plans = RelationQueryPlanner::plan(descriptor, filter);
        let fetched = ConcurrentFetchCoordinator::new(self.graph.as_ref())
            .fetch(&plans)
            .await?;

        let Some(enrichment) = descriptor.enrichment else {
            return Ok(RelationPage {
                items: fetched.records.into_iter().map(|r| r.properties).collect(),
                total: fetched.total,
            });
        };

        let documents = IndexEnricher::new(self.search.as_ref(), enrichment)
            .enrich(&fetched.records)
            .await?;
        Ok(ResultMerger::new(enrichment.tie_break_field).merge(documents, fetched.total))
    }

    // ========================================================================
    // Named relation operations
    // ========================================================================

    /// Articles citing the subject article
    pub async fn cited_by(&self, filter: &RelationFilter) -> RelationResult<RelationPage> {
        self.query(RelationKind::CitedBy, filter).await
    }

    /// Articles cited by the subject article
    pub async fn citing(&self, filter: &RelationFilter) -> RelationResult<RelationPage> {
        self.query(RelationKind::Citing, filter).await
    }

    /// Cases referring to the subject article
    pub async fn cases_citing_article(
        &self,
        filter: &RelationFilter,
    ) -> RelationResult<RelationPage> {
        self.query(RelationKind::CasesCitingArticle, filter).await
    }

    /// Raw references mentioning the subject article
    pub async fn references_mentioning_article(
        &self,
        filter: &RelationFilter,
    ) -> RelationResult<RelationPage> {
        self.query(RelationKind::ReferencesMentioningArticle, filter).await
    }

    pub async fn count_cited_by(&self, subject_id: &str) -> RelationResult<u64> {
        self.count(RelationKind::CitedBy, subject_id).await
    }

    pub async fn count_citing(&self, subject_id: &str) -> RelationResult<u64> {
        self.count(RelationKind::Citing, subject_id).await
    }

    pub async fn count_cases_citing_article(&self, subject_id: &str) -> RelationResult<u64> {
        self.count(RelationKind::CasesCitingArticle, subject_id).await
    }

    pub async fn count_references_mentioning_article(
        &self,
        subject_id: &str,
    ) -> RelationResult<u64> {
        self.count(RelationKind::ReferencesMentioningArticle, subject_id).await
    }
}
