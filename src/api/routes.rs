//! API route definitions

use super::handlers::{self, ApiState};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Article relations
        // ====================================================================
        .route(
            "/api/articles/{number}/{relation}",
            get(handlers::list_relation),
        )
        .route(
            "/api/articles/{number}/{relation}/count",
            get(handlers::count_relation),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
