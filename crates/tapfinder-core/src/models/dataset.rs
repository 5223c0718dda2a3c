use geo::{BoundingRect, MultiPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use super::point::GeoPoint;
use crate::error::TapfinderError;

/// One point dataset on disk, optionally tagged with a regional prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Path to a GeoJSON FeatureCollection
    pub path: PathBuf,

    /// When set, point ids become `{prefix}_{id}_{index}`
    #[serde(default)]
    pub prefix: Option<String>,
}

impl DatasetSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), prefix: None }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Parses `PATH` or `PATH:PREFIX`
impl FromStr for DatasetSpec {
    type Err = TapfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TapfinderError::ConfigInvalid {
                key: "dataset".to_string(),
                reason: "Dataset path is empty".to_string(),
            });
        }

        match s.rsplit_once(':') {
            Some((path, prefix))
                if !path.is_empty()
                    && !prefix.is_empty()
                    && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                Ok(DatasetSpec::new(path).with_prefix(prefix))
            }
            _ => Ok(DatasetSpec::new(s)),
        }
    }
}

/// Aggregate view of a loaded point collection
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub with_coordinates: usize,
    pub by_category: BTreeMap<String, usize>,

    /// `[min_lon, min_lat, max_lon, max_lat]` over valid coordinates
    pub bbox: Option<[f64; 4]>,
}

impl DatasetSummary {
    pub fn from_points(points: &[GeoPoint]) -> Self {
        let mut by_category = BTreeMap::new();
        for point in points {
            *by_category.entry(point.category.to_string()).or_insert(0) += 1;
        }

        let located: MultiPoint<f64> = points
            .iter()
            .filter_map(|p| p.valid_coordinate())
            .map(|c| c.as_point())
            .collect();

        let bbox = located.bounding_rect().map(|rect| {
            let (min, max) = (rect.min(), rect.max());
            [min.x, min.y, max.x, max.y]
        });

        Self {
            total: points.len(),
            with_coordinates: located.0.len(),
            by_category,
            bbox,
        }
    }

    pub fn missing_coordinates(&self) -> usize {
        self.total - self.with_coordinates
    }
}
