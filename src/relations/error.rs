//! Failure taxonomy for relation queries

use super::descriptor::RelationKind;
use thiserror::Error;

/// A relation query failed in one of its store calls.
///
/// The store's own error is kept as the source, unchanged. Absent counts,
/// absent names and empty index lookups are not errors and never end up here.
#[derive(Debug, Error)]
pub enum RelationQueryError {
    #[error("graph query for relation '{relation}' failed")]
    Graph {
        relation: RelationKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("search index lookup in '{index}' for number '{number}' failed")]
    Enrichment {
        index: &'static str,
        number: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type RelationResult<T> = std::result::Result<T, RelationQueryError>;
