use serde::Serialize;
use tapfinder_core::{Category, DistanceUnit, RankedResult, ReferenceLocation};

/// One ranked location
#[derive(Debug, Serialize)]
pub struct NearbyResult {
    pub id: String,
    pub name: String,
    pub address: String,
    pub category: Category,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance: Option<f64>,
    pub directions_url: Option<String>,
}

impl From<RankedResult> for NearbyResult {
    fn from(result: RankedResult) -> Self {
        let directions_url = result.point.directions_url();
        let coordinate = result.point.valid_coordinate();
        Self {
            id: result.point.id,
            name: result.point.name,
            address: result.point.address,
            category: result.point.category,
            latitude: coordinate.map(|c| c.latitude()),
            longitude: coordinate.map(|c| c.longitude()),
            distance: result.distance,
            directions_url,
        }
    }
}

/// Nearby search response
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub reference: Option<ReferenceLocation>,
    pub unit: DistanceUnit,
    pub results: Vec<NearbyResult>,
    pub nearby: Vec<NearbyResult>,
}

/// Geocode response
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub reference: ReferenceLocation,
}

/// Cache invalidation response
#[derive(Debug, Serialize)]
pub struct CacheInvalidateResponse {
    pub invalidated: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "tapfinder-api" }
    }
}
