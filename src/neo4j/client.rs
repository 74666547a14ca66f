//! Neo4j client for the citation graph

use super::models::{Binding, ColumnKind, GraphRow, NodeRecord};
use crate::relations::planner::{ParamValue, QueryPlan};
use anyhow::{Context, Result};
use neo4rs::{query, Graph, Query};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Create a new Neo4j client.
    ///
    /// The graph is populated by ingestion; no schema is created here.
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Execute a query with parameters and collect all rows
    pub(crate) async fn execute_with_params(&self, q: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a relation query plan, converting rows by the plan's columns
    pub async fn run_plan(&self, plan: &QueryPlan) -> Result<Vec<GraphRow>> {
        let mut q = query(&plan.cypher());
        for (name, value) in plan.params() {
            q = match value {
                ParamValue::Text(s) => q.param(name, s),
                ParamValue::Integer(n) => q.param(name, n),
            };
        }

        let rows = self
            .execute_with_params(q)
            .await
            .with_context(|| format!("{} query failed", plan.descriptor().kind))?;

        rows.iter()
            .map(|row| {
                let mut converted = GraphRow::new();
                for column in plan.columns() {
                    let binding = match column.kind {
                        ColumnKind::Node => match row.get::<neo4rs::Node>(column.name) {
                            Ok(node) => Binding::Node(node_to_record(&node)),
                            Err(_) => Binding::Value(Value::Null),
                        },
                        ColumnKind::Integer => Binding::Value(
                            row.get::<i64>(column.name)
                                .map(Value::from)
                                .unwrap_or(Value::Null),
                        ),
                        ColumnKind::Text => Binding::Value(
                            row.get::<String>(column.name)
                                .map(Value::String)
                                .unwrap_or(Value::Null),
                        ),
                    };
                    converted.insert(column.name, binding);
                }
                Ok(converted)
            })
            .collect()
    }
}

fn node_to_record(node: &neo4rs::Node) -> NodeRecord {
    let mut properties = Map::new();
    for key in node.keys() {
        properties.insert(key.to_string(), property_value(node, key));
    }
    let labels = node.labels().iter().map(|l| l.to_string()).collect();
    NodeRecord::new(node.id(), labels, properties)
}

/// Any Bolt property as JSON: lists and maps recurse, temporals become
/// strings. Values with no JSON form are logged and kept as null.
fn property_value(node: &neo4rs::Node, key: &str) -> Value {
    match node.get::<Value>(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(node_id = node.id(), key, error = %e, "Dropped node property");
            Value::Null
        }
    }
}
