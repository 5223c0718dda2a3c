use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::{GeocodeCandidate, Geocoder};
use crate::error::{Result, TapfinderError};

const PUBLIC_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("tapfinder/", env!("CARGO_PKG_VERSION"));

/// OpenStreetMap Nominatim search client
pub struct NominatimGeocoder {
    /// Base URL (e.g., "https://nominatim.openstreetmap.org")
    base_url: String,

    /// Country restriction passed as `countrycodes`
    country: String,

    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            country: country.into().to_lowercase(),
            client: reqwest::Client::new(),
        }
    }

    /// Client for the public OpenStreetMap instance
    pub fn public(country: impl Into<String>) -> Self {
        Self::new(PUBLIC_BASE_URL, country)
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/search", self.base_url.trim_end_matches('/')),
            &[
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
                ("countrycodes", self.country.as_str()),
                ("q", query),
            ],
        )
        .map_err(|e| TapfinderError::ConfigInvalid {
            key: "nominatim_url".to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.search_url(query)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| TapfinderError::GeocoderUnavailable {
                provider: self.name().to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TapfinderError::GeocoderResponse {
                provider: self.name().to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let places: Vec<NominatimPlace> =
            response.json().await.map_err(|e| TapfinderError::GeocoderResponse {
                provider: self.name().to_string(),
                reason: format!("Failed to parse response: {}", e),
            })?;

        let candidates: Vec<GeocodeCandidate> =
            places.into_iter().filter_map(NominatimPlace::into_candidate).collect();

        tracing::debug!(provider = self.name(), query, found = candidates.len(), "Geocoded");
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

/// One entry of the Nominatim `jsonv2` search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country_code: Option<String>,
}

impl NominatimPlace {
    /// Coordinates arrive as strings; unparseable entries are dropped
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        Some(GeocodeCandidate {
            latitude: self.lat.parse().ok()?,
            longitude: self.lon.parse().ok()?,
            label: self.display_name,
            country_code: self.address.and_then(|a| a.country_code).map(|c| c.to_lowercase()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let geocoder = NominatimGeocoder::new("http://localhost:8080/", "US");
        let url = geocoder.search_url("15201").unwrap();
        assert_eq!(url.path(), "/search");
        let query = url.query().unwrap();
        assert!(query.contains("countrycodes=us"));
        assert!(query.contains("q=15201"));
        assert!(query.contains("format=jsonv2"));
    }

    #[test]
    fn test_place_conversion() {
        let place = NominatimPlace {
            lat: "40.4406".to_string(),
            lon: "-79.9959".to_string(),
            display_name: "Pittsburgh".to_string(),
            address: Some(NominatimAddress { country_code: Some("US".to_string()) }),
        };
        let candidate = place.into_candidate().unwrap();
        assert_eq!(candidate.latitude, 40.4406);
        assert_eq!(candidate.longitude, -79.9959);
        assert_eq!(candidate.country_code.as_deref(), Some("us"));
    }

    #[test]
    fn test_unparseable_place_is_dropped() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "-79.9959".to_string(),
            display_name: String::new(),
            address: None,
        };
        assert!(place.into_candidate().is_none());
    }
}
