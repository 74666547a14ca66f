//! Neo4j row models for the legal-knowledge graph
//!
//! Rows returned by the graph store are kept as loosely typed bindings; the
//! relation core decides which bindings it needs and normalizes them.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============================================================================
// Nodes
// ============================================================================

/// A graph node with its store-assigned id and property map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: Map<String, Value>,
}

impl NodeRecord {
    pub fn new(id: i64, labels: Vec<String>, properties: Map<String, Value>) -> Self {
        Self {
            id,
            labels,
            properties,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }
}

// ============================================================================
// Rows
// ============================================================================

/// A single named binding in a result row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Node(NodeRecord),
    Value(Value),
}

impl Binding {
    #[cfg(test)]
    pub fn as_node(&self) -> Option<&NodeRecord> {
        match self {
            Binding::Node(node) => Some(node),
            Binding::Value(_) => None,
        }
    }

    /// Integer view of a scalar binding. Floats are truncated, strings parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Binding::Value(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Binding::Value(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Binding::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// One result row: column name -> binding
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphRow {
    bindings: BTreeMap<String, Binding>,
}

impl GraphRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, binding: Binding) -> Self {
        self.insert(column, binding);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, binding: Binding) {
        self.bindings.insert(column.into(), binding);
    }

    pub fn get(&self, column: &str) -> Option<&Binding> {
        self.bindings.get(column)
    }

    pub fn take(&mut self, column: &str) -> Option<Binding> {
        self.bindings.remove(column)
    }
}

// ============================================================================
// Projection columns
// ============================================================================

/// Expected type of a projected column, used when decoding driver rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Node,
    Integer,
    Text,
}

/// A projected column of a query plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}
