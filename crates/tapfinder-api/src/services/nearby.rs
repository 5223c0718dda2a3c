use tapfinder_core::search::Locator;
use tapfinder_core::{DistanceUnit, ReferenceLocation, ReferenceSource};

use crate::dto::{NearbyRequest, NearbyResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for nearby searches
pub struct NearbyService;

impl NearbyService {
    /// Rank the cached datasets for one request
    pub async fn execute(state: &AppState, request: NearbyRequest) -> Result<NearbyResponse, ApiError> {
        let reference = Self::reference(&request)?;
        let unit = match request.unit.as_deref() {
            Some(unit) => unit
                .parse::<DistanceUnit>()
                .map_err(|e| ApiError::bad_request("Invalid unit").with_details(e.to_string()))?,
            None => state.config.distance_unit.value,
        };
        let max_results = match request.max_results {
            Some(n) => usize::try_from(n.max(0)).unwrap_or(usize::MAX),
            None => state.config.max_results.value,
        };

        let points = state.points().await?;
        let locator = Locator::new(points, state.geocoder.clone(), state.config.region.value.clone())
            .with_max_results(max_results)
            .with_unit(unit)
            .with_nearby_count(state.config.nearby_preview.value);

        let outcome = locator.search(request.query.as_deref().unwrap_or_default(), reference).await;

        Ok(NearbyResponse {
            reference: outcome.reference,
            unit,
            results: outcome.results.into_iter().map(Into::into).collect(),
            nearby: outcome.nearby.into_iter().map(Into::into).collect(),
        })
    }

    fn reference(request: &NearbyRequest) -> Result<Option<ReferenceLocation>, ApiError> {
        match (request.latitude, request.longitude) {
            (Some(latitude), Some(longitude)) => {
                let reference = ReferenceLocation::new(latitude, longitude, ReferenceSource::Geolocation);
                if !reference.is_valid() {
                    return Err(ApiError::bad_request("Coordinates out of range")
                        .with_details(format!("latitude {}, longitude {}", latitude, longitude)));
                }
                Ok(Some(reference))
            }
            (None, None) => Ok(None),
            _ => Err(ApiError::bad_request("latitude and longitude must be given together")),
        }
    }
}
