//! Count and page query plans for a relation
//!
//! Both plans of a pair are rendered from one [`QueryPlan`] value that differs
//! only in its [`PlanShape`], so the match pattern and predicate cannot drift
//! between the total and the page.

use super::descriptor::{
    Direction, RelationDescriptor, ANCHOR_ALIAS, NAME_ALIAS, NAME_LABEL, NAME_PROPERTY,
    RESULT_ALIAS, SUBJECT_KEY,
};
use super::predicate::{SearchPredicate, SEARCH_PARAM};
use crate::neo4j::models::{Column, ColumnKind};
use serde::{Deserialize, Serialize};

pub const SUBJECT_PARAM: &str = "subject_id";
pub const SKIP_PARAM: &str = "skip";
pub const LIMIT_PARAM: &str = "limit";

pub const TOTAL_COLUMN: &str = "total";
pub const ENTITY_COLUMN: &str = "entity";
pub const NAME_COLUMN: &str = "name";
pub const NODE_ID_COLUMN: &str = "node_id";

const COUNT_COLUMNS: &[Column] = &[Column::new(TOTAL_COLUMN, ColumnKind::Integer)];
const PAGE_COLUMNS: &[Column] = &[
    Column::new(ENTITY_COLUMN, ColumnKind::Node),
    Column::new(NAME_COLUMN, ColumnKind::Text),
    Column::new(NODE_ID_COLUMN, ColumnKind::Text),
];

/// Caller-supplied filter for a relation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationFilter {
    /// Citation number of the anchor article
    pub subject_id: String,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: u64,
}

impl RelationFilter {
    pub fn new(subject_id: impl Into<String>, skip: u64, limit: u64) -> Self {
        Self {
            subject_id: subject_id.into(),
            search: None,
            skip,
            limit,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// What a plan projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanShape {
    /// A single `total` row with the distinct result count
    Count,
    /// Distinct results ordered by popularity, sliced by skip/limit
    Page { skip: u64, limit: u64 },
}

/// A named query parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

/// A fully parameterized read query over one relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    descriptor: &'static RelationDescriptor,
    subject_id: String,
    predicate: Option<SearchPredicate>,
    shape: PlanShape,
}

impl QueryPlan {
    pub fn descriptor(&self) -> &'static RelationDescriptor {
        self.descriptor
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn predicate(&self) -> Option<&SearchPredicate> {
        self.predicate.as_ref()
    }

    pub fn shape(&self) -> PlanShape {
        self.shape
    }

    /// Columns every row of this plan carries
    pub fn columns(&self) -> &'static [Column] {
        match self.shape {
            PlanShape::Count => COUNT_COLUMNS,
            PlanShape::Page { .. } => PAGE_COLUMNS,
        }
    }

    /// Render the Cypher text. User input only ever appears as `$` parameters.
    pub fn cypher(&self) -> String {
        let mut cypher = self.match_clause();
        match self.shape {
            PlanShape::Count => {
                cypher.push_str(&format!(
                    "\nRETURN count(DISTINCT {}) AS {}",
                    RESULT_ALIAS, TOTAL_COLUMN
                ));
            }
            PlanShape::Page { .. } => {
                let name_projection = if self.descriptor.resolves_name() {
                    format!("{}.{}", NAME_ALIAS, NAME_PROPERTY)
                } else {
                    "null".to_string()
                };
                cypher.push_str(&format!(
                    "\nRETURN DISTINCT {r} AS {e}, {n} AS {nc}, elementId({r}) AS {id}",
                    r = RESULT_ALIAS,
                    e = ENTITY_COLUMN,
                    n = name_projection,
                    nc = NAME_COLUMN,
                    id = NODE_ID_COLUMN,
                ));
                match self.descriptor.order_by {
                    Some(field) => cypher.push_str(&format!(
                        "\nORDER BY {}.{} DESC, {}",
                        ENTITY_COLUMN, field, NODE_ID_COLUMN
                    )),
                    None => cypher.push_str(&format!("\nORDER BY {}", NODE_ID_COLUMN)),
                }
                cypher.push_str(&format!("\nSKIP ${}\nLIMIT ${}", SKIP_PARAM, LIMIT_PARAM));
            }
        }
        cypher
    }

    /// Named parameters referenced by [`QueryPlan::cypher`]
    pub fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = vec![(SUBJECT_PARAM, ParamValue::Text(self.subject_id.clone()))];
        if let Some(predicate) = &self.predicate {
            params.push((SEARCH_PARAM, ParamValue::Text(predicate.term().to_string())));
        }
        if let PlanShape::Page { skip, limit } = self.shape {
            params.push((SKIP_PARAM, ParamValue::Integer(to_cypher_int(skip))));
            params.push((LIMIT_PARAM, ParamValue::Integer(to_cypher_int(limit))));
        }
        params
    }

    /// MATCH / OPTIONAL MATCH / WHERE prefix shared by both shapes
    fn match_clause(&self) -> String {
        let d = self.descriptor;
        let anchor = format!(
            "({}:{} {{{}: ${}}})",
            ANCHOR_ALIAS, d.anchor_label, SUBJECT_KEY, SUBJECT_PARAM
        );
        let result = format!("({}:{})", RESULT_ALIAS, d.result_label);
        let pattern = match d.direction {
            Direction::ResultToAnchor => format!("{}-[:{}]->{}", result, d.relationship, anchor),
            Direction::AnchorToResult => format!("{}-[:{}]->{}", anchor, d.relationship, result),
        };

        let mut cypher = format!("MATCH {}", pattern);
        match d.name_relationship {
            Some(name_rel) => {
                cypher.push_str(&format!(
                    "\nOPTIONAL MATCH ({})-[:{}]->({}:{})\nWITH {}, {}",
                    RESULT_ALIAS, name_rel, NAME_ALIAS, NAME_LABEL, RESULT_ALIAS, NAME_ALIAS
                ));
            }
            None => cypher.push_str(&format!("\nWITH {}", RESULT_ALIAS)),
        }
        if let Some(predicate) = &self.predicate {
            cypher.push_str(&format!("\nWHERE {}", predicate.to_cypher()));
        }
        cypher
    }
}

fn to_cypher_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// The count and page plans for one filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanPair {
    pub count: QueryPlan,
    pub page: QueryPlan,
}

/// Builds query plans from relation descriptors
pub struct RelationQueryPlanner;

impl RelationQueryPlanner {
    /// Count and page plans sharing the same pattern and predicate
    pub fn plan(descriptor: &'static RelationDescriptor, filter: &RelationFilter) -> PlanPair {
        let base = QueryPlan {
            descriptor,
            subject_id: filter.subject_id.clone(),
            predicate: SearchPredicate::build(descriptor, filter.search.as_deref()),
            shape: PlanShape::Count,
        };
        let page = QueryPlan {
            shape: PlanShape::Page {
                skip: filter.skip,
                limit: filter.limit,
            },
            ..base.clone()
        };
        PlanPair { count: base, page }
    }

    /// Unfiltered count for badge/summary displays
    pub fn count_only(descriptor: &'static RelationDescriptor, subject_id: &str) -> QueryPlan {
        QueryPlan {
            descriptor,
            subject_id: subject_id.to_string(),
            predicate: None,
            shape: PlanShape::Count,
        }
    }
}
