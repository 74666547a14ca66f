//! Declarative descriptions of the citation relations that can be queried.
//!
//! Each relation is plain data consumed by the generic planner; no relation
//! owns hand-written query text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alias bound to the entity identified by the caller (always an Article).
pub const ANCHOR_ALIAS: &str = "anchor";
/// Alias bound to the entities returned by a relation query.
pub const RESULT_ALIAS: &str = "result";
/// Alias bound to the optionally resolved Name node.
pub const NAME_ALIAS: &str = "name";

/// Property on the anchor that carries the caller-supplied subject id.
pub const SUBJECT_KEY: &str = "number";
/// Label of the optional display-name node.
pub const NAME_LABEL: &str = "Name";
/// Property of the Name node holding the display text.
pub const NAME_PROPERTY: &str = "name";

/// The four supported relation queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// Articles that cite the subject article
    CitedBy,
    /// Articles the subject article cites
    Citing,
    /// Cases that refer to the subject article
    CasesCitingArticle,
    /// Free-text references mentioning the subject article
    ReferencesMentioningArticle,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::CitedBy,
        RelationKind::Citing,
        RelationKind::CasesCitingArticle,
        RelationKind::ReferencesMentioningArticle,
    ];

    /// URL / CLI slug for this relation
    pub fn slug(self) -> &'static str {
        match self {
            RelationKind::CitedBy => "cited-by",
            RelationKind::Citing => "citing",
            RelationKind::CasesCitingArticle => "cases",
            RelationKind::ReferencesMentioningArticle => "references",
        }
    }

    /// The static descriptor driving this relation's queries
    pub fn descriptor(self) -> &'static RelationDescriptor {
        match self {
            RelationKind::CitedBy => &CITED_BY,
            RelationKind::Citing => &CITING,
            RelationKind::CasesCitingArticle => &CASES_CITING_ARTICLE,
            RelationKind::ReferencesMentioningArticle => &REFERENCES_MENTIONING_ARTICLE,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| {
                format!(
                    "unknown relation '{}', expected one of: {}",
                    s,
                    RelationKind::ALL.map(RelationKind::slug).join(", ")
                )
            })
    }
}

/// Which end of the relationship the returned entities sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(result)-[REL]->(anchor)`
    ResultToAnchor,
    /// `(anchor)-[REL]->(result)`
    AnchorToResult,
}

/// A field eligible for keyword matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Property of the returned entity
    Entity(&'static str),
    /// Property of the entity's resolved Name node
    Name(&'static str),
}

impl SearchField {
    /// Cypher property access for this field, e.g. `result.number`
    pub fn accessor(&self) -> String {
        match self {
            SearchField::Entity(prop) => format!("{}.{}", RESULT_ALIAS, prop),
            SearchField::Name(prop) => format!("{}.{}", NAME_ALIAS, prop),
        }
    }
}

/// How graph results are enriched from the search index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrichment {
    /// Search index holding the denormalized documents
    pub index: &'static str,
    /// Natural key shared by the graph entity and the indexed document
    pub key_field: &'static str,
    /// Document field whose presence sorts a document first
    pub tie_break_field: &'static str,
}

/// One directed citation relation and everything needed to query it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub kind: RelationKind,
    pub anchor_label: &'static str,
    pub relationship: &'static str,
    pub result_label: &'static str,
    pub direction: Direction,
    /// Relationship to the optional Name node, if the result kind has one
    pub name_relationship: Option<&'static str>,
    pub search_fields: &'static [SearchField],
    /// Popularity property ordering the page (descending); `None` orders by store id only
    pub order_by: Option<&'static str>,
    /// `None` returns the raw graph properties without index enrichment
    pub enrichment: Option<Enrichment>,
}

impl RelationDescriptor {
    pub fn resolves_name(&self) -> bool {
        self.name_relationship.is_some()
    }
}

const ARTICLE_SEARCH_FIELDS: &[SearchField] = &[
    SearchField::Name(NAME_PROPERTY),
    SearchField::Entity("number"),
    SearchField::Entity("text"),
];

const CASE_SEARCH_FIELDS: &[SearchField] = &[
    SearchField::Name(NAME_PROPERTY),
    SearchField::Entity("number"),
    SearchField::Entity("judgment"),
    SearchField::Entity("facts"),
    SearchField::Entity("reasoning"),
    SearchField::Entity("headnotes"),
    SearchField::Entity("year"),
    SearchField::Entity("decision_type"),
];

const REFERENCE_SEARCH_FIELDS: &[SearchField] =
    &[SearchField::Entity("context"), SearchField::Entity("text")];

const ARTICLE_ENRICHMENT: Enrichment = Enrichment {
    index: crate::meilisearch::indexes::index_names::ARTICLES,
    key_field: "number",
    tie_break_field: "name",
};

pub static CITED_BY: RelationDescriptor = RelationDescriptor {
    kind: RelationKind::CitedBy,
    anchor_label: "Article",
    relationship: "CITES",
    result_label: "Article",
    direction: Direction::ResultToAnchor,
    name_relationship: Some("IS_NAMED"),
    search_fields: ARTICLE_SEARCH_FIELDS,
    order_by: Some("citing_cases"),
    enrichment: Some(ARTICLE_ENRICHMENT),
};

pub static CITING: RelationDescriptor = RelationDescriptor {
    kind: RelationKind::Citing,
    anchor_label: "Article",
    relationship: "CITES",
    result_label: "Article",
    direction: Direction::AnchorToResult,
    name_relationship: Some("IS_NAMED"),
    search_fields: ARTICLE_SEARCH_FIELDS,
    order_by: Some("citing_cases"),
    enrichment: Some(ARTICLE_ENRICHMENT),
};

pub static CASES_CITING_ARTICLE: RelationDescriptor = RelationDescriptor {
    kind: RelationKind::CasesCitingArticle,
    anchor_label: "Article",
    relationship: "REFERS_TO",
    result_label: "Case",
    direction: Direction::ResultToAnchor,
    name_relationship: Some("IS_NAMED"),
    search_fields: CASE_SEARCH_FIELDS,
    order_by: Some("citing_cases"),
    enrichment: Some(Enrichment {
        index: crate::meilisearch::indexes::index_names::CASES,
        key_field: "number",
        tie_break_field: "caseName",
    }),
};

pub static REFERENCES_MENTIONING_ARTICLE: RelationDescriptor = RelationDescriptor {
    kind: RelationKind::ReferencesMentioningArticle,
    anchor_label: "Article",
    relationship: "MENTIONS",
    result_label: "Reference",
    direction: Direction::ResultToAnchor,
    name_relationship: None,
    search_fields: REFERENCE_SEARCH_FIELDS,
    order_by: None,
    enrichment: None,
};
