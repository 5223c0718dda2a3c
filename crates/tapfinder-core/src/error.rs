//! Error types for Tapfinder

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TapfinderError {
    // Dataset errors
    #[error("Dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Invalid dataset {source_name}: {reason}")]
    DatasetFormat { source_name: String, reason: String },

    #[error("No datasets configured. Pass --dataset or set `datasets` in the config file")]
    NoDatasets,

    // Geocoding errors
    #[error("Geocoder {provider} unavailable: {reason}")]
    GeocoderUnavailable { provider: String, reason: String },

    #[error("Geocoder {provider} returned an unusable response: {reason}")]
    GeocoderResponse { provider: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Preference store errors
    #[error("Preference store error: {0}")]
    PreferenceStore(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, TapfinderError>;
