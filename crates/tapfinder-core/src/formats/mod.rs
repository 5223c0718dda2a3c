//! Point dataset loading
//!
//! Datasets are GeoJSON FeatureCollections of point features. Several
//! regional files can be merged into one collection; a dataset prefix keeps
//! their ids unique (`{prefix}_{properties.id}_{index}`).

use crate::error::{Result, TapfinderError};
use crate::models::{DatasetSpec, GeoPoint};

pub mod geojson;

pub use self::geojson::{to_feature_collection, GeoJsonPointReader};

/// Load and concatenate every dataset, in order
pub fn load_datasets(specs: &[DatasetSpec]) -> Result<Vec<GeoPoint>> {
    if specs.is_empty() {
        return Err(TapfinderError::NoDatasets);
    }

    let reader = GeoJsonPointReader;
    let mut points = Vec::new();

    for spec in specs {
        let loaded = reader.read_prefixed(&spec.path, spec.prefix.as_deref())?;

        tracing::info!(
            path = %spec.path.display(),
            prefix = spec.prefix.as_deref().unwrap_or(""),
            count = loaded.len(),
            "Loaded point dataset"
        );
        points.extend(loaded);
    }

    Ok(points)
}
