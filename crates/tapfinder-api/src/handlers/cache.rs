use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::CacheInvalidateResponse;
use crate::state::AppState;

pub async fn invalidate_cache(State(state): State<Arc<AppState>>) -> Json<CacheInvalidateResponse> {
    let invalidated = state.invalidate_datasets().await;
    tracing::info!(invalidated, "Dataset cache invalidated");
    Json(CacheInvalidateResponse { invalidated })
}
