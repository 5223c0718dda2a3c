use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tapfinder_core::geocoding::{reference_label, select_candidate, Geocoder};
use tapfinder_core::{ReferenceLocation, ReferenceSource};

use crate::dto::{GeocodeQuery, GeocodeResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve free text to the best candidate in the configured region
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("Query parameter q must not be empty"));
    }

    let candidates = state.geocoder.geocode(query).await?;
    let region = &state.config.region.value;
    let Some(candidate) = select_candidate(&candidates, region) else {
        return Err(ApiError::not_found(format!("No match for '{}' in region {}", query, region)));
    };

    let reference = ReferenceLocation::new(candidate.latitude, candidate.longitude, ReferenceSource::Search)
        .with_label(reference_label(query));

    Ok(Json(GeocodeResponse {
        query: query.to_string(),
        latitude: candidate.latitude,
        longitude: candidate.longitude,
        label: candidate.label.clone(),
        reference,
    }))
}
