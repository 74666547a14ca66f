//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Delegates to the inherent `run_plan` on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::GraphRow;
use super::traits::GraphStore;
use crate::relations::planner::QueryPlan;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn run_query(&self, plan: &QueryPlan) -> anyhow::Result<Vec<GraphRow>> {
        self.run_plan(plan).await
    }
}
