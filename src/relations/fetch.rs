//! Concurrent execution of a relation's count and page plans

use super::descriptor::RelationKind;
use super::error::{RelationQueryError, RelationResult};
use super::planner::{
    PlanPair, QueryPlan, ENTITY_COLUMN, NAME_COLUMN, NODE_ID_COLUMN, TOTAL_COLUMN,
};
use crate::meilisearch::indexes::value_as_key;
use crate::neo4j::models::{Binding, GraphRow};
use crate::neo4j::GraphStore;
use serde_json::{Map, Value};

/// A page row normalized into a plain record
#[derive(Debug, Clone, PartialEq)]
pub struct RelationRecord {
    /// `elementId` of the entity
    pub node_id: String,
    pub properties: Map<String, Value>,
    /// Text of the resolved Name node, when there is one
    pub name: Option<String>,
}

impl RelationRecord {
    /// String form of a property, used as the enrichment key
    pub fn key(&self, field: &str) -> Option<String> {
        self.properties.get(field).and_then(value_as_key)
    }

    /// Normalize a page row; rows without an entity node are dropped
    fn from_row(mut row: GraphRow) -> Option<Self> {
        let node = match row.take(ENTITY_COLUMN)? {
            Binding::Node(node) => node,
            Binding::Value(_) => return None,
        };
        let node_id = row
            .get(NODE_ID_COLUMN)
            .and_then(Binding::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| node.id.to_string());
        let name = row
            .get(NAME_COLUMN)
            .and_then(Binding::as_str)
            .map(str::to_string);

        Some(Self {
            node_id,
            properties: node.properties,
            name,
        })
    }
}

/// The graph side of a relation page
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub total: u64,
    pub records: Vec<RelationRecord>,
}

/// Scalar count from a count plan's rows; anything missing or malformed is zero
pub fn extract_count(rows: &[GraphRow]) -> u64 {
    rows.first()
        .and_then(|row| row.get(TOTAL_COLUMN))
        .and_then(Binding::as_i64)
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

/// Issues the count and page plans together and waits for both
pub struct ConcurrentFetchCoordinator<'a> {
    graph: &'a dyn GraphStore,
}

impl<'a> ConcurrentFetchCoordinator<'a> {
    pub fn new(graph: &'a dyn GraphStore) -> Self {
        Self { graph }
    }

    /// Run both plans concurrently. Either failing fails the whole fetch.
    pub async fn fetch(&self, plans: &PlanPair) -> RelationResult<FetchedPage> {
        let relation = plans.page.descriptor().kind;
        let (count_rows, page_rows) = tokio::try_join!(
            self.graph.run_query(&plans.count),
            self.graph.run_query(&plans.page),
        )
        .map_err(|source| graph_error(relation, source))?;

        let total = extract_count(&count_rows);
        let fetched = page_rows.len();
        let records: Vec<RelationRecord> = page_rows
            .into_iter()
            .filter_map(RelationRecord::from_row)
            .collect();
        if records.len() != fetched {
            tracing::warn!(
                "Relation {}: dropped {} page rows without an entity binding",
                relation,
                fetched - records.len()
            );
        }

        Ok(FetchedPage { total, records })
    }

    /// Run a single count plan
    pub async fn count(&self, plan: &QueryPlan) -> RelationResult<u64> {
        let rows = self
            .graph
            .run_query(plan)
            .await
            .map_err(|source| graph_error(plan.descriptor().kind, source))?;
        Ok(extract_count(&rows))
    }
}

fn graph_error(relation: RelationKind, source: anyhow::Error) -> RelationQueryError {
    tracing::warn!("Relation {}: graph query failed: {:#}", relation, source);
    RelationQueryError::Graph { relation, source }
}
