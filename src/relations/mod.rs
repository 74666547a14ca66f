//! Citation relation queries
//!
//! Each relation is described declaratively by a [`RelationDescriptor`]. A
//! request is planned into a count plan and a page plan over the graph, both
//! run concurrently; page entities are then enriched from the search index
//! and merged into a [`RelationPage`].

pub mod descriptor;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod planner;
pub mod predicate;
pub mod service;

pub use descriptor::{RelationDescriptor, RelationKind};
pub use error::{RelationQueryError, RelationResult};
pub use merge::RelationPage;
pub use planner::RelationFilter;
pub use service::RelationQueryService;
