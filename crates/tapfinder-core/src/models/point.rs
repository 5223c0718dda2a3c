//! Point-of-interest records and the reference location they are ranked against.

use geo::Point;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// A WGS84 coordinate stored as a `geo::Point` (x = longitude, y = latitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LonLat", into = "LonLat")]
pub struct Coordinate(Point<f64>);

impl Coordinate {
    /// Create a coordinate from longitude and latitude in degrees
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    /// Finite and inside longitude [-180, 180], latitude [-90, 90]
    pub fn is_valid(&self) -> bool {
        let (lon, lat) = (self.longitude(), self.latitude());
        lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat)
    }

    pub fn as_point(&self) -> Point<f64> {
        self.0
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self(point)
    }
}

/// Serialized form of a coordinate, in GeoJSON axis order
#[derive(Serialize, Deserialize)]
struct LonLat([f64; 2]);

impl From<LonLat> for Coordinate {
    fn from(value: LonLat) -> Self {
        Coordinate::new(value.0[0], value.0[1])
    }
}

impl From<Coordinate> for LonLat {
    fn from(value: Coordinate) -> Self {
        LonLat([value.longitude(), value.latitude()])
    }
}

/// Customer type of a point of sale, used for presentation grouping only
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Retail,
    OnPremise,
    HomeDelivery,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Retail => "Retail",
            Category::OnPremise => "On-Premise",
            Category::HomeDelivery => "Home-Delivery",
            Category::Other(label) => label,
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "retail" => Category::Retail,
            "onpremise" => Category::OnPremise,
            "homedelivery" => Category::HomeDelivery,
            _ => Category::Other(label.trim().to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from(label.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable location record used as ranking input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Stable unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text address
    pub address: String,

    /// Presentation grouping
    pub category: Category,

    /// None when the source record had no usable point geometry
    pub coordinate: Option<Coordinate>,
}

impl GeoPoint {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        category: Category,
        coordinate: Option<Coordinate>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            category,
            coordinate,
        }
    }

    /// The coordinate, if present and valid
    pub fn valid_coordinate(&self) -> Option<Coordinate> {
        self.coordinate.filter(Coordinate::is_valid)
    }

    /// Case-insensitive substring match against name or address.
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.address.to_lowercase().contains(needle)
    }

    /// Maps link for turn-by-turn directions; falls back to an address
    /// search when the point has no usable coordinate
    pub fn directions_url(&self) -> Option<String> {
        let url = match self.valid_coordinate() {
            Some(c) => {
                let destination = format!("{},{}", c.latitude(), c.longitude());
                Url::parse_with_params(
                    MAPS_DIRECTIONS_URL,
                    &[("api", "1"), ("destination", destination.as_str())],
                )
            }
            None if !self.address.trim().is_empty() => Url::parse_with_params(
                MAPS_SEARCH_URL,
                &[("api", "1"), ("query", self.address.trim())],
            ),
            None => return None,
        };
        url.ok().map(String::from)
    }
}

/// Where a reference location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Device geolocation
    Geolocation,
    /// Geocoded free-text search
    Search,
    /// Direct map interaction
    MapClick,
    /// Restored from a stored preference
    Persisted,
    /// Configured fallback
    #[default]
    Default,
}

/// The ephemeral "distance from where" pair for one ranking call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    pub latitude: f64,
    pub longitude: f64,

    /// Short display label ("you", a zip code, a truncated address)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub source: ReferenceSource,
}

impl ReferenceLocation {
    pub fn new(latitude: f64, longitude: f64, source: ReferenceSource) -> Self {
        Self { latitude, longitude, label: None, source }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }

    pub fn is_valid(&self) -> bool {
        self.coordinate().is_valid()
    }
}
