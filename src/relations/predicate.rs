//! Keyword predicate shared by the count and page plans of a relation

use super::descriptor::{RelationDescriptor, SearchField};

/// Name of the query parameter carrying the case-folded search term
pub const SEARCH_PARAM: &str = "search";

/// Case-insensitive substring match across a relation's declared fields.
///
/// A field that is missing (including every Name field when the entity has
/// no Name) is compared as the empty string, so it never matches and never
/// turns the whole predicate into NULL. List and map properties have no
/// string form; `toStringOrNull` maps them to NULL, so they never match
/// either, where `toString` would fail the query on Neo4j 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPredicate {
    term: String,
    fields: &'static [SearchField],
}

impl SearchPredicate {
    /// Build the predicate for `term`, or `None` when there is nothing to filter on
    pub fn build(descriptor: &RelationDescriptor, term: Option<&str>) -> Option<Self> {
        let term = term.map(str::trim).filter(|t| !t.is_empty())?;
        Some(Self {
            term: term.to_lowercase(),
            fields: descriptor.search_fields,
        })
    }

    /// The case-folded term bound to `$search`
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn fields(&self) -> &'static [SearchField] {
        self.fields
    }

    /// Render the predicate as a parenthesised Cypher boolean expression.
    ///
    /// The term itself is never interpolated; it is referenced as `$search`.
    pub fn to_cypher(&self) -> String {
        let clauses: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                format!(
                    "toLower(coalesce(toStringOrNull({}), '')) CONTAINS ${}",
                    field.accessor(),
                    SEARCH_PARAM
                )
            })
            .collect();
        format!("({})", clauses.join(" OR "))
    }
}
