//! Integration tests for geocoding providers using wiremock HTTP mocks.

use tapfinder_core::geocoding::{
    select_candidate, FallbackGeocoder, Geocoder, MapboxGeocoder, NominatimGeocoder,
};
use tapfinder_core::TapfinderError;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn nominatim_returns_parsed_candidates() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "lat": "40.4649",
            "lon": "-79.9603",
            "display_name": "Lawrenceville, Pittsburgh, Allegheny County, Pennsylvania, 15201, United States",
            "address": { "postcode": "15201", "country_code": "us" }
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "15201"))
        .and(query_param("countrycodes", "us"))
        .and(query_param("format", "jsonv2"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), "us");
    let candidates = geocoder.geocode("15201").await.expect("should geocode");

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].latitude, 40.4649);
    assert_eq!(candidates[0].longitude, -79.9603);
    assert_eq!(candidates[0].country_code.as_deref(), Some("us"));
    assert!(select_candidate(&candidates, "us").is_some());
}

#[tokio::test]
async fn nominatim_empty_answer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), "us");
    assert!(geocoder.geocode("Nowhere Special").await.unwrap().is_empty());
}

#[tokio::test]
async fn nominatim_server_error_is_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), "us");
    let err = geocoder.geocode("15201").await.unwrap_err();
    assert!(matches!(err, TapfinderError::GeocoderResponse { ref provider, .. } if provider == "nominatim"));
}

#[tokio::test]
async fn mapbox_returns_parsed_candidates() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "center": [-80.1, 40.7],
            "place_name": "Cranberry Township, Pennsylvania 16066, United States",
            "context": [{ "id": "country.19678805456372290", "short_code": "us" }]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/16066.json"))
        .and(query_param("access_token", "pk.test"))
        .and(query_param("country", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let geocoder = MapboxGeocoder::new(server.uri(), "pk.test", "us");
    let candidates = geocoder.geocode("16066").await.expect("should geocode");

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].latitude, 40.7);
    assert_eq!(candidates[0].longitude, -80.1);
    assert!(candidates[0].label.starts_with("Cranberry Township"));
}

#[tokio::test]
async fn mapbox_rejected_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Not Authorized - Invalid Token"
        })))
        .mount(&server)
        .await;

    let geocoder = MapboxGeocoder::new(server.uri(), "pk.bad", "us");
    let err = geocoder.geocode("16066").await.unwrap_err();
    assert!(matches!(err, TapfinderError::GeocoderResponse { .. }));
}

#[tokio::test]
async fn fallback_uses_mapbox_when_nominatim_fails() {
    let nominatim = MockServer::start().await;
    let mapbox = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&nominatim)
        .await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/15201.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [{ "center": [-79.9603, 40.4649], "place_name": "Pittsburgh, PA 15201" }]
        })))
        .expect(1)
        .mount(&mapbox)
        .await;

    let geocoder = FallbackGeocoder::new(vec![
        Box::new(NominatimGeocoder::new(nominatim.uri(), "us")),
        Box::new(MapboxGeocoder::new(mapbox.uri(), "pk.test", "us")),
    ]);

    let candidates = geocoder.geocode("15201").await.expect("fallback should answer");
    assert_eq!(candidates[0].label, "Pittsburgh, PA 15201");
    assert_eq!(candidates[0].country_code, None);
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    // Nothing listens on port 9 on a test host
    let geocoder = NominatimGeocoder::new("http://127.0.0.1:9", "us");
    let err = geocoder.geocode("15201").await.unwrap_err();
    assert!(matches!(err, TapfinderError::GeocoderUnavailable { .. }));
}
