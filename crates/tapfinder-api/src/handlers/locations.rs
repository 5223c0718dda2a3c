use std::sync::Arc;

use axum::{extract::State, Json};
use geojson::FeatureCollection;
use tapfinder_core::formats::to_feature_collection;

use crate::error::ApiError;
use crate::state::AppState;

/// Every configured location as a GeoJSON FeatureCollection
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let points = state.points().await?;
    Ok(Json(to_feature_collection(&points)))
}
