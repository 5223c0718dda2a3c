use serde::Deserialize;

/// Nearby search request body
///
/// Every field is optional. `latitude` and `longitude` must be given together.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Free text: a place to geocode, or a name/address filter
    pub query: Option<String>,

    /// Values of zero or less yield an empty result list
    pub max_results: Option<i64>,

    /// "miles" or "kilometers"
    pub unit: Option<String>,
}

/// Query string for the geocode endpoint
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}
