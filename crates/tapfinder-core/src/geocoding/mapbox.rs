use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::{GeocodeCandidate, Geocoder};
use crate::error::{Result, TapfinderError};

const PUBLIC_BASE_URL: &str = "https://api.mapbox.com";

/// Mapbox forward-geocoding (places) client
pub struct MapboxGeocoder {
    base_url: String,
    access_token: String,
    country: String,
    client: reqwest::Client,
}

impl MapboxGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            country: country.into().to_lowercase(),
            client: reqwest::Client::new(),
        }
    }

    pub fn public(access_token: impl Into<String>, country: impl Into<String>) -> Self {
        Self::new(PUBLIC_BASE_URL, access_token, country)
    }

    fn places_url(&self, query: &str) -> Result<Url> {
        let invalid = |reason: String| TapfinderError::ConfigInvalid {
            key: "mapbox_url".to_string(),
            reason,
        };

        let file = format!("{}.json", query);
        let mut url = Url::parse(self.base_url.trim_end_matches('/'))
            .map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places", file.as_str()]);
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("country", &self.country)
            .append_pair("limit", "1");
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.places_url(query)?;
        let response = self.client.get(url).send().await.map_err(|e| {
            TapfinderError::GeocoderUnavailable {
                provider: self.name().to_string(),
                reason: e.without_url().to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(TapfinderError::GeocoderResponse {
                provider: self.name().to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: PlacesResponse =
            response.json().await.map_err(|e| TapfinderError::GeocoderResponse {
                provider: self.name().to_string(),
                reason: format!("Failed to parse response: {}", e.without_url()),
            })?;

        let candidates: Vec<GeocodeCandidate> =
            body.features.into_iter().filter_map(PlaceFeature::into_candidate).collect();

        tracing::debug!(provider = self.name(), query, found = candidates.len(), "Geocoded");
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "mapbox"
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<PlaceFeature>,
}

#[derive(Debug, Deserialize)]
struct PlaceFeature {
    /// `[longitude, latitude]`
    center: Vec<f64>,
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    context: Vec<PlaceContext>,
}

#[derive(Debug, Deserialize)]
struct PlaceContext {
    id: String,
    #[serde(default)]
    short_code: Option<String>,
}

impl PlaceFeature {
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        let (longitude, latitude) = match self.center.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => return None,
        };

        let country_code = self
            .context
            .iter()
            .find(|ctx| ctx.id.starts_with("country."))
            .and_then(|ctx| ctx.short_code.clone())
            .map(|code| code.to_lowercase());

        Some(GeocodeCandidate { latitude, longitude, label: self.place_name, country_code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_places_url_encodes_query() {
        let geocoder = MapboxGeocoder::new("http://localhost:9000", "pk.test", "US");
        let url = geocoder.places_url("100 Butler St, Pittsburgh").unwrap();
        assert_eq!(
            url.path(),
            "/geocoding/v5/mapbox.places/100%20Butler%20St,%20Pittsburgh.json"
        );
        let query = url.query().unwrap();
        assert!(query.contains("access_token=pk.test"));
        assert!(query.contains("country=us"));
        assert!(query.contains("limit=1"));
    }

    #[test]
    fn test_feature_conversion() {
        let json = r#"{
            "features": [{
                "center": [-79.9959, 40.4406],
                "place_name": "Pittsburgh, Pennsylvania, United States",
                "context": [
                    { "id": "region.1", "short_code": "US-PA" },
                    { "id": "country.2", "short_code": "us" }
                ]
            }]
        }"#;
        let body: PlacesResponse = serde_json::from_str(json).unwrap();
        let candidate = body.features.into_iter().next().unwrap().into_candidate().unwrap();
        assert_eq!(candidate.longitude, -79.9959);
        assert_eq!(candidate.latitude, 40.4406);
        assert_eq!(candidate.country_code.as_deref(), Some("us"));
    }
}
