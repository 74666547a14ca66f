//! In-memory mock implementation of GraphStore for testing.
//!
//! Holds a small property graph and interprets `QueryPlan`s structurally
//! (pattern, optional Name, predicate, DISTINCT, ordering, SKIP/LIMIT) with
//! the same semantics as the rendered Cypher.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::meilisearch::indexes::value_as_key;
use crate::neo4j::models::{Binding, GraphRow, NodeRecord};
use crate::neo4j::traits::GraphStore;
use crate::relations::descriptor::{
    Direction, SearchField, NAME_LABEL, NAME_PROPERTY, SUBJECT_KEY,
};
use crate::relations::planner::{
    PlanShape, QueryPlan, ENTITY_COLUMN, NAME_COLUMN, NODE_ID_COLUMN, TOTAL_COLUMN,
};
use crate::relations::predicate::SearchPredicate;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashSet;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct MockEdge {
    from: i64,
    rel: String,
    to: i64,
}

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    nodes: RwLock<Vec<NodeRecord>>,
    edges: RwLock<Vec<MockEdge>>,
    failure: RwLock<Option<String>>,
    executed: RwLock<Vec<String>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            edges: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            executed: RwLock::new(Vec::new()),
        }
    }

    /// Add a node with a JSON object of properties; returns its id
    pub async fn add_node(&self, label: &str, properties: Value) -> i64 {
        let mut nodes = self.nodes.write().await;
        let id = nodes.len() as i64;
        let properties = properties.as_object().cloned().unwrap_or_default();
        nodes.push(NodeRecord::new(id, vec![label.to_string()], properties));
        id
    }

    /// Add a directed relationship `(from)-[rel]->(to)`
    pub async fn relate(&self, from: i64, rel: &str, to: i64) {
        self.edges.write().await.push(MockEdge {
            from,
            rel: rel.to_string(),
            to,
        });
    }

    /// Attach a Name node to `entity` through `IS_NAMED`
    pub async fn name_entity(&self, entity: i64, name: &str) -> i64 {
        let name_id = self
            .add_node(NAME_LABEL, json!({ NAME_PROPERTY: name }))
            .await;
        self.relate(entity, "IS_NAMED", name_id).await;
        name_id
    }

    /// Find a node id by label and property value
    pub async fn find_node(&self, label: &str, key: &str, value: &str) -> Option<i64> {
        self.nodes
            .read()
            .await
            .iter()
            .find(|n| {
                n.has_label(label)
                    && n.property(key).and_then(value_as_key).as_deref() == Some(value)
            })
            .map(|n| n.id)
    }

    /// Make every subsequent query fail with `message`
    pub async fn fail_queries(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    /// Number of plans executed so far
    pub async fn executed_plans(&self) -> usize {
        self.executed.read().await.len()
    }

    /// Cypher text of every executed plan, in execution order
    pub async fn executed_cypher(&self) -> Vec<String> {
        self.executed.read().await.clone()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Same semantics as the rendered predicate: missing values never match, and
/// neither do lists or maps, which `toStringOrNull` turns into NULL.
fn predicate_matches(
    predicate: &SearchPredicate,
    result: &NodeRecord,
    name: Option<&NodeRecord>,
) -> bool {
    predicate.fields().iter().any(|field| {
        let value = match field {
            SearchField::Entity(prop) => result.property(prop),
            SearchField::Name(prop) => name.and_then(|n| n.property(prop)),
        };
        value
            .and_then(value_as_key)
            .is_some_and(|text| text.to_lowercase().contains(predicate.term()))
    })
}

/// Descending order with nulls first, as Neo4j sorts them.
fn cmp_popularity_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
    }
}

/// Stand-in for `elementId()`: an opaque string that sorts like the node id
fn element_id(id: i64) -> String {
    format!("mock:{:012}", id)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// GraphStore implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn run_query(&self, plan: &QueryPlan) -> Result<Vec<GraphRow>> {
        self.executed.write().await.push(plan.cypher());
        if let Some(message) = self.failure.read().await.clone() {
            anyhow::bail!(message);
        }

        let nodes = self.nodes.read().await;
        let edges = self.edges.read().await;
        let node = |id: i64| nodes.iter().find(|n| n.id == id);
        let d = plan.descriptor();

        let anchors: HashSet<i64> = nodes
            .iter()
            .filter(|n| {
                n.has_label(d.anchor_label)
                    && n.property(SUBJECT_KEY).and_then(value_as_key).as_deref()
                        == Some(plan.subject_id())
            })
            .map(|n| n.id)
            .collect();

        // One entry per matched path, duplicates included
        let mut matches: Vec<(&NodeRecord, Option<&NodeRecord>)> = Vec::new();
        for edge in edges.iter().filter(|e| e.rel == d.relationship) {
            let (result_id, anchor_id) = match d.direction {
                Direction::ResultToAnchor => (edge.from, edge.to),
                Direction::AnchorToResult => (edge.to, edge.from),
            };
            if !anchors.contains(&anchor_id) {
                continue;
            }
            let Some(result) = node(result_id).filter(|n| n.has_label(d.result_label)) else {
                continue;
            };
            match d.name_relationship {
                Some(name_rel) => {
                    let names: Vec<&NodeRecord> = edges
                        .iter()
                        .filter(|e| e.from == result.id && e.rel == name_rel)
                        .filter_map(|e| node(e.to))
                        .filter(|n| n.has_label(NAME_LABEL))
                        .collect();
                    if names.is_empty() {
                        matches.push((result, None));
                    } else {
                        matches.extend(names.into_iter().map(|n| (result, Some(n))));
                    }
                }
                None => matches.push((result, None)),
            }
        }

        if let Some(predicate) = plan.predicate() {
            matches.retain(|(result, name)| predicate_matches(predicate, result, *name));
        }

        match plan.shape() {
            PlanShape::Count => {
                let distinct: HashSet<i64> = matches.iter().map(|(r, _)| r.id).collect();
                Ok(vec![GraphRow::new().with(
                    TOTAL_COLUMN,
                    Binding::Value(json!(distinct.len())),
                )])
            }
            PlanShape::Page { skip, limit } => {
                let mut seen = HashSet::new();
                let mut distinct: Vec<(&NodeRecord, Option<&NodeRecord>)> = matches
                    .into_iter()
                    .filter(|(r, n)| seen.insert((r.id, n.map(|n| n.id))))
                    .collect();

                distinct.sort_by(|(a, _), (b, _)| {
                    let by_popularity = match d.order_by {
                        Some(field) => cmp_popularity_desc(
                            a.property(field).and_then(Value::as_f64),
                            b.property(field).and_then(Value::as_f64),
                        ),
                        None => Ordering::Equal,
                    };
                    by_popularity.then_with(|| element_id(a.id).cmp(&element_id(b.id)))
                });

                Ok(distinct
                    .into_iter()
                    .skip(to_usize(skip))
                    .take(to_usize(limit))
                    .map(|(result, name)| {
                        let name = name
                            .and_then(|n| n.property(NAME_PROPERTY))
                            .cloned()
                            .unwrap_or(Value::Null);
                        GraphRow::new()
                            .with(ENTITY_COLUMN, Binding::Node(result.clone()))
                            .with(NAME_COLUMN, Binding::Value(name))
                            .with(NODE_ID_COLUMN, Binding::Value(json!(element_id(result.id))))
                    })
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::descriptor::{RelationDescriptor, RelationKind, CITED_BY};
    use crate::relations::fetch::extract_count;
    use crate::relations::planner::{RelationFilter, RelationQueryPlanner};
    use crate::test_helpers::seed_citation_graph;

    fn all_descriptors() -> [&'static RelationDescriptor; 4] {
        RelationKind::ALL.map(RelationKind::descriptor)
    }

    async fn seeded() -> MockGraphStore {
        let graph = MockGraphStore::new();
        seed_citation_graph(&graph).await;
        graph
    }

    #[tokio::test]
    async fn test_unbounded_page_length_equals_count() {
        let graph = seeded().await;
        for descriptor in all_descriptors() {
            for search in [None, Some("a"), Some("alpha"), Some("2019"), Some("zzz")] {
                let mut filter = RelationFilter::new("5", 0, u64::MAX);
                filter.search = search.map(str::to_string);
                let plans = RelationQueryPlanner::plan(descriptor, &filter);

                let count = extract_count(&graph.run_query(&plans.count).await.unwrap());
                let page = graph.run_query(&plans.page).await.unwrap();
                assert_eq!(
                    count as usize,
                    page.len(),
                    "{:?} with search {:?}",
                    descriptor.kind,
                    search
                );
            }
        }
    }

    #[tokio::test]
    async fn test_count_ignores_skip_and_limit() {
        let graph = seeded().await;
        let a = RelationQueryPlanner::plan(&CITED_BY, &RelationFilter::new("5", 0, 1));
        let b = RelationQueryPlanner::plan(&CITED_BY, &RelationFilter::new("5", 7, 0));

        let count_a = extract_count(&graph.run_query(&a.count).await.unwrap());
        let count_b = extract_count(&graph.run_query(&b.count).await.unwrap());
        assert_eq!(count_a, count_b);
        assert!(graph.run_query(&b.page).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_paths_are_collapsed() {
        let graph = seeded().await;
        // seed has two CITES edges from "2" to "5"
        let plans = RelationQueryPlanner::plan(&CITED_BY, &RelationFilter::new("5", 0, 10));
        let page = graph.run_query(&plans.page).await.unwrap();
        let ids: Vec<&str> = page
            .iter()
            .filter_map(|r| r.get(NODE_ID_COLUMN).and_then(Binding::as_str))
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), page.len());
        assert_eq!(ids.len(), unique.len());
    }

    #[tokio::test]
    async fn test_missing_name_does_not_exclude_without_search() {
        let graph = seeded().await;
        let plans = RelationQueryPlanner::plan(&CITED_BY, &RelationFilter::new("5", 0, 10));
        let page = graph.run_query(&plans.page).await.unwrap();

        let unnamed = page
            .iter()
            .filter(|r| r.get(NAME_COLUMN) == Some(&Binding::Value(Value::Null)))
            .count();
        assert_eq!(unnamed, 1);
    }

    #[tokio::test]
    async fn test_every_searched_row_contains_term() {
        let graph = seeded().await;
        let term = "a";
        for descriptor in all_descriptors() {
            let filter = RelationFilter::new("5", 0, 100).with_search(term);
            let plans = RelationQueryPlanner::plan(descriptor, &filter);
            for row in graph.run_query(&plans.page).await.unwrap() {
                let entity = row.get(ENTITY_COLUMN).and_then(Binding::as_node).unwrap();
                let in_fields = descriptor.search_fields.iter().any(|f| match f {
                    SearchField::Entity(p) => entity
                        .property(p)
                        .and_then(value_as_key)
                        .is_some_and(|v| v.to_lowercase().contains(term)),
                    SearchField::Name(_) => row
                        .get(NAME_COLUMN)
                        .and_then(Binding::as_str)
                        .is_some_and(|v| v.to_lowercase().contains(term)),
                });
                assert!(in_fields, "{:?}: {:?}", descriptor.kind, entity);
            }
        }
    }

    #[tokio::test]
    async fn test_page_ordered_by_popularity() {
        let graph = seeded().await;
        let plans = RelationQueryPlanner::plan(
            RelationKind::CitedBy.descriptor(),
            &RelationFilter::new("5", 0, 10),
        );
        let page = graph.run_query(&plans.page).await.unwrap();
        let popularity: Vec<i64> = page
            .iter()
            .filter_map(|r| r.get(ENTITY_COLUMN).and_then(Binding::as_node))
            .filter_map(|n| n.property("citing_cases").and_then(Value::as_i64))
            .collect();
        assert_eq!(popularity, vec![7, 3]);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let graph = seeded().await;
        graph.fail_queries("boom").await;
        let plan = RelationQueryPlanner::count_only(&CITED_BY, "5");
        let err = graph.run_query(&plan).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(graph.executed_plans().await, 1);
    }

    #[tokio::test]
    async fn test_records_executed_cypher() {
        let graph = seeded().await;
        let plans = RelationQueryPlanner::plan(&CITED_BY, &RelationFilter::new("5", 0, 10));
        graph.run_query(&plans.count).await.unwrap();
        graph.run_query(&plans.page).await.unwrap();

        let cypher = graph.executed_cypher().await;
        assert_eq!(cypher.len(), 2);
        assert!(cypher[0].contains("count(DISTINCT result)"));
        assert!(cypher[1].contains("SKIP $skip"));
        assert!(cypher[1].contains("LIMIT $limit"));
    }

    #[tokio::test]
    async fn test_list_property_never_matches_search() {
        let graph = MockGraphStore::new();
        let article = graph.add_node("Article", json!({"number": "5"})).await;
        let case = graph
            .add_node(
                "Case",
                json!({
                    "number": "C-3",
                    "facts": "Applicant released",
                    "headnotes": ["Detention unlawful", "Remedy"],
                }),
            )
            .await;
        graph.relate(case, "REFERS_TO", article).await;
        let cases = RelationKind::CasesCitingArticle.descriptor();

        let filter = RelationFilter::new("5", 0, 10).with_search("detention");
        let plans = RelationQueryPlanner::plan(cases, &filter);
        assert_eq!(extract_count(&graph.run_query(&plans.count).await.unwrap()), 0);
        assert!(graph.run_query(&plans.page).await.unwrap().is_empty());

        let filter = RelationFilter::new("5", 0, 10).with_search("released");
        let plans = RelationQueryPlanner::plan(cases, &filter);
        assert_eq!(extract_count(&graph.run_query(&plans.count).await.unwrap()), 1);
        let page = graph.run_query(&plans.page).await.unwrap();
        let entity = page[0].get(ENTITY_COLUMN).and_then(Binding::as_node).unwrap();
        assert_eq!(entity.properties["headnotes"], json!(["Detention unlawful", "Remedy"]));
    }

    #[test]
    fn test_element_ids_sort_like_node_ids() {
        assert!(element_id(2) < element_id(10));
        assert_ne!(element_id(2), element_id(3));
    }

    #[test]
    fn test_nulls_sort_first_descending() {
        assert_eq!(cmp_popularity_desc(None, Some(1.0)), Ordering::Less);
        assert_eq!(cmp_popularity_desc(Some(5.0), Some(1.0)), Ordering::Less);
        assert_eq!(cmp_popularity_desc(Some(1.0), Some(5.0)), Ordering::Greater);
    }
}
