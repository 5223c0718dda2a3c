use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{NearbyRequest, NearbyResponse};
use crate::error::ApiError;
use crate::services::NearbyService;
use crate::state::AppState;

pub async fn handle_nearby(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NearbyRequest>,
) -> Result<Json<NearbyResponse>, ApiError> {
    tracing::info!(
        has_reference = request.latitude.is_some() || request.longitude.is_some(),
        query = request.query.as_deref().unwrap_or(""),
        max_results = request.max_results,
        "Processing nearby request"
    );

    let response = NearbyService::execute(&state, request).await?;

    Ok(Json(response))
}
