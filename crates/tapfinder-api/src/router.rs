use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Locations
        .route("/api/v1/locations", get(handlers::list_locations))
        .route("/api/v1/nearby", post(handlers::handle_nearby))
        .route("/api/v1/geocode", get(handlers::geocode))

        // Cache
        .route("/api/v1/cache/invalidate", post(handlers::invalidate_cache))

        .with_state(state)
}
