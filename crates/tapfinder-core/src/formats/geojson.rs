//! GeoJSON point dataset reader

use geojson::{Feature, FeatureCollection, GeoJson, Value};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::Path;

use crate::error::{Result, TapfinderError};
use crate::models::{Category, Coordinate, GeoPoint};

/// Reads GeoJSON point datasets into [`GeoPoint`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoJsonPointReader;

impl GeoJsonPointReader {
    /// Read a dataset file
    pub fn read(&self, path: &Path) -> Result<Vec<GeoPoint>> {
        self.read_prefixed(path, None)
    }

    /// Read a dataset file, tagging ids as `{prefix}_{source id}_{index}` when a prefix is given
    pub fn read_prefixed(&self, path: &Path, prefix: Option<&str>) -> Result<Vec<GeoPoint>> {
        if !path.exists() {
            return Err(TapfinderError::DatasetNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path)?;
        self.parse_str_prefixed(&content, &path.display().to_string(), prefix)
    }

    /// Parse dataset content; `source_name` is only used in error messages
    pub fn parse_str(&self, content: &str, source_name: &str) -> Result<Vec<GeoPoint>> {
        self.parse_str_prefixed(content, source_name, None)
    }

    pub fn parse_str_prefixed(
        &self,
        content: &str,
        source_name: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<GeoPoint>> {
        let geojson: GeoJson = content.parse().map_err(|e| TapfinderError::DatasetFormat {
            source_name: source_name.to_string(),
            reason: format!("Failed to parse GeoJSON: {}", e),
        })?;

        let points: Vec<GeoPoint> = match geojson {
            GeoJson::FeatureCollection(fc) => fc
                .features
                .iter()
                .enumerate()
                .map(|(idx, feature)| self.convert_feature(feature, idx, prefix))
                .collect(),
            GeoJson::Feature(feature) => vec![self.convert_feature(&feature, 0, prefix)],
            GeoJson::Geometry(_) => {
                return Err(TapfinderError::DatasetFormat {
                    source_name: source_name.to_string(),
                    reason: "Expected a FeatureCollection, found a bare geometry".to_string(),
                })
            }
        };

        let unlocated = points.iter().filter(|p| p.valid_coordinate().is_none()).count();
        if unlocated > 0 {
            tracing::warn!(
                source = source_name,
                unlocated,
                "Features without a usable point geometry will not be ranked"
            );
        }

        Ok(points)
    }

    /// Convert a GeoJSON feature to a GeoPoint
    fn convert_feature(&self, feature: &Feature, idx: usize, prefix: Option<&str>) -> GeoPoint {
        let empty = Map::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);

        // properties.id > feature id > position
        let source_id = || {
            string_prop(props, &["id"])
                .or_else(|| {
                    feature.id.as_ref().map(|id| match id {
                        geojson::feature::Id::String(s) => s.clone(),
                        geojson::feature::Id::Number(n) => n.to_string(),
                    })
                })
                .unwrap_or_else(|| idx.to_string())
        };

        // prefixed ids never build on uniqueId
        let id = match prefix {
            Some(prefix) => format!("{}_{}_{}", prefix, source_id(), idx),
            None => string_prop(props, &["uniqueId"]).unwrap_or_else(source_id),
        };

        let name = string_prop(props, &["Name", "name"]).unwrap_or_default();
        let address = string_prop(props, &["address", "Address"]).unwrap_or_default();
        let category = string_prop(props, &["customerType", "category"])
            .map(Category::from)
            .unwrap_or_default();

        let coordinate = feature.geometry.as_ref().and_then(|geometry| match &geometry.value {
            Value::Point(position) if position.len() >= 2 => {
                Some(Coordinate::new(position[0], position[1]))
            }
            _ => None,
        });

        GeoPoint { id, name, address, category, coordinate }
    }
}

/// First present property among `keys`, rendered as a string
fn string_prop(props: &Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match props.get(*key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Convert points back to a FeatureCollection, using the dataset property names
pub fn to_feature_collection(points: &[GeoPoint]) -> FeatureCollection {
    let features = points
        .iter()
        .map(|point| {
            let mut properties = Map::new();
            properties.insert("uniqueId".to_string(), JsonValue::from(point.id.clone()));
            properties.insert("Name".to_string(), JsonValue::from(point.name.clone()));
            properties.insert("address".to_string(), JsonValue::from(point.address.clone()));
            properties
                .insert("customerType".to_string(), JsonValue::from(point.category.to_string()));

            Feature {
                bbox: None,
                geometry: point.coordinate.map(|c| {
                    geojson::Geometry::new(Value::Point(vec![c.longitude(), c.latitude()]))
                }),
                id: Some(geojson::feature::Id::String(point.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}
