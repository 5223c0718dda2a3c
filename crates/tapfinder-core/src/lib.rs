//! Tapfinder Core - Location models, distance ranking, and configuration
//!
//! This crate contains the nearby-location ranker together with the
//! collaborators that feed it: GeoJSON point datasets, geocoding providers,
//! persisted reference preferences, and a TTL cache for loaded datasets.

pub mod cache;
pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod geocoding;
pub mod models;
pub mod preference;
pub mod search;

pub use error::{Result, TapfinderError};
pub use crate::geo::{haversine_distance, nearby_preview, rank};
pub use models::{
    Category, Coordinate, DistanceUnit, GeoPoint, RankOptions, RankedResult, ReferenceLocation,
    ReferenceSource,
};
