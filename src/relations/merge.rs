//! Flattening and tie-break ordering of enriched results

use crate::meilisearch::indexes::SearchDocument;
use serde::Serialize;
use serde_json::Value;

/// A page of relation results.
///
/// `total` is the graph-side distinct count for the filter; `items` holds
/// whatever index documents matched the page's entities, so `items.len()`
/// may differ from the page size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationPage {
    pub items: Vec<SearchDocument>,
    pub total: u64,
}

/// Flattens per-record documents and moves named documents first
pub struct ResultMerger {
    tie_break_field: &'static str,
}

impl ResultMerger {
    pub fn new(tie_break_field: &'static str) -> Self {
        Self { tie_break_field }
    }

    /// Flatten `per_record` in order, then stable-partition documents carrying
    /// the tie-break field ahead of those without it.
    pub fn merge(&self, per_record: Vec<Vec<SearchDocument>>, total: u64) -> RelationPage {
        let mut items: Vec<SearchDocument> = per_record.into_iter().flatten().collect();
        // sort_by_key is stable: equal keys keep their graph order
        items.sort_by_key(|doc| !has_value(doc, self.tie_break_field));
        RelationPage { items, total }
    }
}

fn has_value(doc: &SearchDocument, field: &str) -> bool {
    match doc.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
