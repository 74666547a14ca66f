//! GraphStore trait definition
//!
//! Abstract interface over the graph database used by the relation core.
//! Implemented by `Neo4jClient` and, in tests, by an in-memory mock.

use crate::neo4j::models::GraphRow;
use crate::relations::planner::QueryPlan;
use anyhow::Result;
use async_trait::async_trait;

/// Read-only graph query execution
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a parameterized plan and return its rows.
    ///
    /// Each row carries the bindings named by `plan.columns()`. Driver and
    /// network failures are returned as errors; an empty result is `Ok(vec![])`.
    async fn run_query(&self, plan: &QueryPlan) -> Result<Vec<GraphRow>>;
}
