use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::point::{GeoPoint, ReferenceLocation};
use crate::error::TapfinderError;

/// Unit for computed distances; selects the earth-radius constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    /// Mean earth radius in this unit
    pub fn earth_radius(&self) -> f64 {
        match self {
            DistanceUnit::Miles => 3959.0,
            DistanceUnit::Kilometers => 6371.0,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = TapfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "miles" | "mi" => Ok(DistanceUnit::Miles),
            "kilometers" | "km" => Ok(DistanceUnit::Kilometers),
            _ => Err(TapfinderError::ConfigInvalid {
                key: "distance_unit".to_string(),
                reason: format!("Invalid distance unit: {}. Use miles or kilometers", s),
            }),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Miles => f.write_str("miles"),
            DistanceUnit::Kilometers => f.write_str("kilometers"),
        }
    }
}

/// Inputs for one ranking call
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Rank by distance from here; absent means no distances are computed
    pub reference: Option<ReferenceLocation>,

    /// Case-insensitive substring filter on name and address
    pub text_query: Option<String>,

    /// Upper bound on the number of results
    pub max_results: usize,

    pub unit: DistanceUnit,
}

impl RankOptions {
    pub fn new(max_results: usize, unit: DistanceUnit) -> Self {
        Self { reference: None, text_query: None, max_results, unit }
    }

    pub fn with_reference(mut self, reference: ReferenceLocation) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_text_query(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    /// The reference, if present and inside valid coordinate ranges
    pub fn valid_reference(&self) -> Option<&ReferenceLocation> {
        self.reference.as_ref().filter(|r| r.is_valid())
    }

    /// The lowercased query, if it is non-empty. Whitespace is part of the needle.
    pub fn normalized_query(&self) -> Option<String> {
        self.text_query.as_deref().filter(|q| !q.is_empty()).map(str::to_lowercase)
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self::new(10, DistanceUnit::Miles)
    }
}

/// A point annotated with its distance from the reference location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub point: GeoPoint,

    /// None when the ranking call had no reference location
    pub distance: Option<f64>,
}
