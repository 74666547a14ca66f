//! Index definitions for Meilisearch

use serde_json::{Map, Value};

/// A denormalized Article or Case projection stored in the search index.
///
/// Documents are kept as flat property maps; the relation core only reads
/// the natural key and the display-name fields.
pub type SearchDocument = Map<String, Value>;

/// Index names
pub mod index_names {
    pub const ARTICLES: &str = "articles";
    pub const CASES: &str = "cases";
}

/// Build a Meilisearch equality filter, e.g. `number = "12a"`.
///
/// The value is quoted and escaped so it cannot alter the filter expression.
pub fn equality_filter(field: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{} = \"{}\"", field, escaped)
}

/// String form of a document or node property used for key comparisons
pub fn value_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
