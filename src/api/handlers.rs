//! API request handlers

use crate::api::RelationQueryParams;
use crate::meilisearch::indexes::SearchDocument;
use crate::relations::{RelationKind, RelationQueryError, RelationQueryService};
use crate::RelationLimits;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub service: RelationQueryService,
    /// Paging defaults and caps applied to incoming requests
    pub limits: RelationLimits,
}

/// Shared API state
pub type ApiState = Arc<ServerState>;

// ============================================================================
// Health
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check; does not touch the backends
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Relations
// ============================================================================

/// A page of relation results with the request's paging echoed back
#[derive(Debug, Serialize)]
pub struct RelationPageResponse {
    pub items: Vec<SearchDocument>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

fn parse_relation(slug: &str) -> Result<RelationKind, AppError> {
    slug.parse().map_err(AppError::NotFound)
}

/// List one relation of an article
pub async fn list_relation(
    State(state): State<ApiState>,
    Path((number, relation)): Path<(String, String)>,
    query: Result<Query<RelationQueryParams>, QueryRejection>,
) -> Result<Json<RelationPageResponse>, AppError> {
    let kind = parse_relation(&relation)?;
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = params
        .into_filter(&number, &state.limits)
        .map_err(AppError::BadRequest)?;

    let page = state.service.query(kind, &filter).await?;
    Ok(Json(RelationPageResponse {
        items: page.items,
        total: page.total,
        skip: filter.skip,
        limit: filter.limit,
    }))
}

/// Count one relation of an article, ignoring search and paging
pub async fn count_relation(
    State(state): State<ApiState>,
    Path((number, relation)): Path<(String, String)>,
) -> Result<Json<CountResponse>, AppError> {
    let kind = parse_relation(&relation)?;
    let count = state.service.count(kind, &number).await?;
    Ok(Json(CountResponse { count }))
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<RelationQueryError> for AppError {
    fn from(err: RelationQueryError) -> Self {
        AppError::Internal(err.into())
    }
}
