//! Query parameter structs for relation endpoints

use crate::relations::RelationFilter;
use crate::RelationLimits;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Helper to deserialize optional numbers from query string
fn deserialize_option_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    use serde::de::Error;
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.is_empty() => s.parse().map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Search and pagination parameters for relation endpoints
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RelationQueryParams {
    /// Free-text term matched case-insensitively against the relation's fields
    pub search: Option<String>,
    /// Items to skip (default: 0)
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub skip: Option<i64>,
    /// Max items to return (default and cap from `relations` config)
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub limit: Option<i64>,
}

impl RelationQueryParams {
    /// Validate against `limits` and build the core filter
    pub fn into_filter(
        self,
        subject_id: &str,
        limits: &RelationLimits,
    ) -> Result<RelationFilter, String> {
        let skip = match self.skip {
            None => 0,
            Some(n) => u64::try_from(n).map_err(|_| "skip cannot be negative".to_string())?,
        };
        let limit = match self.limit {
            None => limits.default_limit,
            Some(n) => u64::try_from(n).map_err(|_| "limit cannot be negative".to_string())?,
        };
        if limit > limits.max_limit {
            return Err(format!("limit cannot exceed {}", limits.max_limit));
        }

        let filter = RelationFilter::new(subject_id, skip, limit);
        Ok(match self.search {
            Some(term) => filter.with_search(term),
            None => filter,
        })
    }
}
