//! Geocoding providers
//!
//! Turns free text (a zip code, a street address) into candidate
//! coordinates. Provider failures stay here; the ranker only ever receives
//! a resolved [`ReferenceLocation`](crate::models::ReferenceLocation).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, TapfinderError};

pub mod fallback;
pub mod mapbox;
pub mod nominatim;
pub mod search;

pub use fallback::FallbackGeocoder;
pub use mapbox::MapboxGeocoder;
pub use nominatim::NominatimGeocoder;
pub use search::{looks_like_place, reference_label};

/// One geocoding answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub latitude: f64,
    pub longitude: f64,

    /// Provider's display name for the match
    pub label: String,

    /// ISO 3166-1 alpha-2 code, lowercase, when the provider reports one
    pub country_code: Option<String>,
}

/// Geocoder trait that all providers implement
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free text to zero or more candidates, best first
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;

    /// Provider name for logs and errors
    fn name(&self) -> &str;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        (**self).geocode(query).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        (**self).geocode(query).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Pick the first candidate inside `country`.
///
/// Candidates without a country code are accepted, since the providers
/// were already asked to restrict results to the region.
pub fn select_candidate<'a>(
    candidates: &'a [GeocodeCandidate],
    country: &str,
) -> Option<&'a GeocodeCandidate> {
    candidates.iter().find(|candidate| match &candidate.country_code {
        Some(code) => code.eq_ignore_ascii_case(country),
        None => true,
    })
}

/// Supported geocoding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderKind {
    /// OpenStreetMap Nominatim, with Mapbox as fallback when a token is set
    #[default]
    Nominatim,
    /// Mapbox only
    Mapbox,
}

impl FromStr for GeocoderKind {
    type Err = TapfinderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nominatim" | "osm" => Ok(GeocoderKind::Nominatim),
            "mapbox" => Ok(GeocoderKind::Mapbox),
            _ => Err(TapfinderError::ConfigInvalid {
                key: "geocoder".to_string(),
                reason: format!("Unknown geocoder: {}. Use nominatim or mapbox", s),
            }),
        }
    }
}

/// Build the configured provider chain
pub fn build_geocoder(
    kind: GeocoderKind,
    region: &str,
    mapbox_token: Option<&str>,
) -> Result<Arc<dyn Geocoder>> {
    match (kind, mapbox_token) {
        (GeocoderKind::Mapbox, Some(token)) => Ok(Arc::new(MapboxGeocoder::public(token, region))),
        (GeocoderKind::Mapbox, None) => {
            Err(TapfinderError::ConfigMissing { key: "mapbox_token".to_string() })
        }
        (GeocoderKind::Nominatim, Some(token)) => Ok(Arc::new(FallbackGeocoder::new(vec![
            Box::new(NominatimGeocoder::public(region)),
            Box::new(MapboxGeocoder::public(token, region)),
        ]))),
        (GeocoderKind::Nominatim, None) => Ok(Arc::new(NominatimGeocoder::public(region))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label: &str, country: Option<&str>) -> GeocodeCandidate {
        GeocodeCandidate {
            latitude: 40.0,
            longitude: -80.0,
            label: label.to_string(),
            country_code: country.map(str::to_string),
        }
    }

    #[test]
    fn test_select_candidate_prefers_region() {
        let candidates = vec![
            candidate("Pittsburgh, Scotland", Some("gb")),
            candidate("Pittsburgh, PA", Some("us")),
        ];
        let selected = select_candidate(&candidates, "US").unwrap();
        assert_eq!(selected.label, "Pittsburgh, PA");
    }

    #[test]
    fn test_select_candidate_accepts_unknown_country() {
        let candidates = vec![candidate("Somewhere", None)];
        assert!(select_candidate(&candidates, "us").is_some());
        assert!(select_candidate(&[], "us").is_none());
    }

    #[test]
    fn test_select_candidate_rejects_other_regions() {
        let candidates = vec![candidate("Toronto", Some("ca"))];
        assert!(select_candidate(&candidates, "us").is_none());
    }

    #[test]
    fn test_parse_geocoder_kind() {
        assert_eq!("Nominatim".parse::<GeocoderKind>().unwrap(), GeocoderKind::Nominatim);
        assert_eq!("mapbox".parse::<GeocoderKind>().unwrap(), GeocoderKind::Mapbox);
        assert!("bing".parse::<GeocoderKind>().is_err());
    }

    #[test]
    fn test_build_geocoder() {
        let osm = build_geocoder(GeocoderKind::Nominatim, "us", None).unwrap();
        assert_eq!(osm.name(), "nominatim");

        let chain = build_geocoder(GeocoderKind::Nominatim, "us", Some("pk.test")).unwrap();
        assert_eq!(chain.name(), "fallback");

        assert!(build_geocoder(GeocoderKind::Mapbox, "us", None).is_err());
    }
}
