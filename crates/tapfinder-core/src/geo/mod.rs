//! Geo module for distance ranking
//!
//! This module provides the Haversine distance and the nearby-location ranker.

pub mod distance;
pub mod rank;

// Re-export key functions for convenience
pub use distance::haversine_distance;
pub use rank::{nearby_preview, rank};
