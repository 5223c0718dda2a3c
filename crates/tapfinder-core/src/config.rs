use crate::error::{Result, TapfinderError};
use crate::geocoding::GeocoderKind;
use crate::models::{DatasetSpec, DistanceUnit, ReferenceLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Upper bound for `preference_max_age_days` (about a century)
pub const MAX_PREFERENCE_AGE_DAYS: i64 = 36_500;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Tapfinder
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub distance_unit: ConfigValue<DistanceUnit>,
    pub max_results: ConfigValue<usize>,
    pub nearby_preview: ConfigValue<usize>,
    pub region: ConfigValue<String>,
    pub geocoder: ConfigValue<GeocoderKind>,
    pub mapbox_token: ConfigValue<Option<String>>,
    pub cache_ttl_secs: ConfigValue<u64>,
    pub preference_max_age_days: ConfigValue<i64>,
    pub preference_file: ConfigValue<PathBuf>,
    pub datasets: ConfigValue<Vec<DatasetSpec>>,
    pub default_reference: ConfigValue<Option<ReferenceLocation>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            distance_unit: ConfigValue::new(DistanceUnit::Miles, ConfigSource::Default),
            max_results: ConfigValue::new(20, ConfigSource::Default),
            nearby_preview: ConfigValue::new(3, ConfigSource::Default),
            region: ConfigValue::new("us".to_string(), ConfigSource::Default),
            geocoder: ConfigValue::new(GeocoderKind::Nominatim, ConfigSource::Default),
            mapbox_token: ConfigValue::new(None, ConfigSource::Default),
            cache_ttl_secs: ConfigValue::new(300, ConfigSource::Default),
            preference_max_age_days: ConfigValue::new(7, ConfigSource::Default),
            preference_file: ConfigValue::new(
                PathBuf::from(".tapfinder/preference.json"),
                ConfigSource::Default,
            ),
            datasets: ConfigValue::new(Vec::new(), ConfigSource::Default),
            default_reference: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| TapfinderError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| TapfinderError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(distance_unit) = file_config.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::File);
        }

        if let Some(max_results) = file_config.max_results {
            self.max_results.update(max_results, ConfigSource::File);
        }

        if let Some(nearby_preview) = file_config.nearby_preview {
            self.nearby_preview.update(nearby_preview, ConfigSource::File);
        }

        if let Some(region) = file_config.region {
            self.region.update(region, ConfigSource::File);
        }

        if let Some(geocoder) = file_config.geocoder {
            self.geocoder.update(geocoder, ConfigSource::File);
        }

        if let Some(token) = file_config.mapbox_token {
            self.mapbox_token.update(Some(token), ConfigSource::File);
        }

        if let Some(ttl) = file_config.cache_ttl_secs {
            self.cache_ttl_secs.update(ttl, ConfigSource::File);
        }

        if let Some(days) = file_config.preference_max_age_days {
            if !(0..=MAX_PREFERENCE_AGE_DAYS).contains(&days) {
                return Err(TapfinderError::ConfigInvalid {
                    key: "preference_max_age_days".to_string(),
                    reason: format!("{} is outside 0..={}", days, MAX_PREFERENCE_AGE_DAYS),
                });
            }
            self.preference_max_age_days.update(days, ConfigSource::File);
        }

        if let Some(preference_file) = file_config.preference_file {
            self.preference_file.update(preference_file, ConfigSource::File);
        }

        if !file_config.datasets.is_empty() {
            self.datasets.update(file_config.datasets, ConfigSource::File);
        }

        if let Some(reference) = file_config.default_reference {
            if !reference.is_valid() {
                return Err(TapfinderError::ConfigInvalid {
                    key: "default_reference".to_string(),
                    reason: format!(
                        "Coordinates out of range: {}, {}",
                        reference.latitude, reference.longitude
                    ),
                });
            }
            self.default_reference.update(Some(reference), ConfigSource::File);
        }

        Ok(self)
    }

    /// Like [`load_from_file`](Self::load_from_file), but a missing file is not an error
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            tracing::debug!(path = %path.as_ref().display(), "No config file, using defaults");
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // TAPFINDER_DISTANCE_UNIT
        if let Some(unit) = env_parsed::<DistanceUnit>("TAPFINDER_DISTANCE_UNIT", "miles or kilometers")
        {
            self.distance_unit.update(unit, ConfigSource::Environment);
        }

        // TAPFINDER_MAX_RESULTS
        if let Some(max) = env_parsed::<usize>("TAPFINDER_MAX_RESULTS", "non-negative integer") {
            self.max_results.update(max, ConfigSource::Environment);
        }

        // TAPFINDER_NEARBY_PREVIEW
        if let Some(count) = env_parsed::<usize>("TAPFINDER_NEARBY_PREVIEW", "non-negative integer")
        {
            self.nearby_preview.update(count, ConfigSource::Environment);
        }

        // TAPFINDER_REGION
        if let Ok(region) = env::var("TAPFINDER_REGION") {
            if region.trim().len() == 2 {
                self.region.update(region.trim().to_lowercase(), ConfigSource::Environment);
            } else {
                tracing::warn!(
                    "Invalid TAPFINDER_REGION value '{}': expected two-letter country code",
                    region
                );
            }
        }

        // TAPFINDER_GEOCODER
        if let Some(kind) = env_parsed::<GeocoderKind>("TAPFINDER_GEOCODER", "nominatim or mapbox") {
            self.geocoder.update(kind, ConfigSource::Environment);
        }

        // TAPFINDER_MAPBOX_TOKEN
        if let Ok(token) = env::var("TAPFINDER_MAPBOX_TOKEN") {
            if !token.trim().is_empty() {
                self.mapbox_token.update(Some(token), ConfigSource::Environment);
            }
        }

        // TAPFINDER_CACHE_TTL_SECS
        if let Some(ttl) = env_parsed::<u64>("TAPFINDER_CACHE_TTL_SECS", "seconds") {
            self.cache_ttl_secs.update(ttl, ConfigSource::Environment);
        }

        // TAPFINDER_PREFERENCE_MAX_AGE_DAYS
        if let Some(days) = env_parsed::<i64>("TAPFINDER_PREFERENCE_MAX_AGE_DAYS", "days") {
            if (0..=MAX_PREFERENCE_AGE_DAYS).contains(&days) {
                self.preference_max_age_days.update(days, ConfigSource::Environment);
            } else {
                tracing::warn!(
                    "Invalid TAPFINDER_PREFERENCE_MAX_AGE_DAYS value '{}': expected 0 to {} days",
                    days,
                    MAX_PREFERENCE_AGE_DAYS
                );
            }
        }

        // TAPFINDER_PREFERENCE_FILE
        if let Ok(path) = env::var("TAPFINDER_PREFERENCE_FILE") {
            self.preference_file.update(PathBuf::from(path), ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(distance_unit) = overrides.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::Cli);
        }

        if let Some(max_results) = overrides.max_results {
            self.max_results.update(max_results, ConfigSource::Cli);
        }

        if let Some(region) = overrides.region {
            self.region.update(region, ConfigSource::Cli);
        }

        if let Some(geocoder) = overrides.geocoder {
            self.geocoder.update(geocoder, ConfigSource::Cli);
        }

        if !overrides.datasets.is_empty() {
            self.datasets.update(overrides.datasets, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "distance_unit".to_string(),
            (self.distance_unit.value.to_string(), self.distance_unit.source),
        );

        map.insert(
            "max_results".to_string(),
            (self.max_results.value.to_string(), self.max_results.source),
        );

        map.insert(
            "nearby_preview".to_string(),
            (self.nearby_preview.value.to_string(), self.nearby_preview.source),
        );

        map.insert("region".to_string(), (self.region.value.clone(), self.region.source));

        map.insert(
            "geocoder".to_string(),
            (format!("{:?}", self.geocoder.value).to_lowercase(), self.geocoder.source),
        );

        // Never echo the token itself
        let token = match &self.mapbox_token.value {
            Some(_) => "(set)".to_string(),
            None => "(none)".to_string(),
        };
        map.insert("mapbox_token".to_string(), (token, self.mapbox_token.source));

        map.insert(
            "cache_ttl_secs".to_string(),
            (self.cache_ttl_secs.value.to_string(), self.cache_ttl_secs.source),
        );

        map.insert(
            "preference_max_age_days".to_string(),
            (self.preference_max_age_days.value.to_string(), self.preference_max_age_days.source),
        );

        map.insert(
            "preference_file".to_string(),
            (self.preference_file.value.display().to_string(), self.preference_file.source),
        );

        let datasets = self
            .datasets
            .value
            .iter()
            .map(|spec| match &spec.prefix {
                Some(prefix) => format!("{}:{}", spec.path.display(), prefix),
                None => spec.path.display().to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        map.insert("datasets".to_string(), (datasets, self.datasets.source));

        let reference = match &self.default_reference.value {
            Some(r) => format!("{:.4}, {:.4}", r.latitude, r.longitude),
            None => "(none)".to_string(),
        };
        map.insert("default_reference".to_string(), (reference, self.default_reference.source));

        map
    }
}

fn env_parsed<T: FromStr>(var: &str, expected: &str) -> Option<T> {
    let raw = env::var(var).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", var, raw, expected);
            None
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    distance_unit: Option<DistanceUnit>,
    max_results: Option<usize>,
    nearby_preview: Option<usize>,
    region: Option<String>,
    geocoder: Option<GeocoderKind>,
    mapbox_token: Option<String>,
    cache_ttl_secs: Option<u64>,
    preference_max_age_days: Option<i64>,
    preference_file: Option<PathBuf>,
    #[serde(default)]
    datasets: Vec<DatasetSpec>,
    default_reference: Option<ReferenceLocation>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub distance_unit: Option<DistanceUnit>,
    pub max_results: Option<usize>,
    pub region: Option<String>,
    pub geocoder: Option<GeocoderKind>,
    pub datasets: Vec<DatasetSpec>,
}
