use serde::Serialize;
use tapfinder_core::models::DatasetSummary;
use tapfinder_core::{DistanceUnit, RankedResult, ReferenceLocation};

/// Output for nearby command
#[derive(Debug, Serialize)]
pub struct NearbyOutput {
    pub reference: Option<ReferenceLocation>,
    pub unit: DistanceUnit,
    pub results: Vec<RankedResult>,
    pub nearby: Vec<RankedResult>,
}

/// Output for inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub datasets: Vec<String>,
    pub summary: DatasetSummary,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}
