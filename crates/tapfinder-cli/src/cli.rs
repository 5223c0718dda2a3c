use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tapfinder_core::models::DatasetSpec;
use tapfinder_core::DistanceUnit;

/// Tapfinder - find the nearest points of sale
#[derive(Parser, Debug)]
#[command(name = "tapfinder")]
#[command(about = "Rank nearby locations by distance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./tapfinder.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List locations nearest to a reference point
    Nearby(NearbyArgs),

    /// Summarize the configured datasets
    Inspect(InspectArgs),

    /// Show every configuration value and where it came from
    Config,
}

/// Dataset selection shared by commands that load points
#[derive(Args, Debug, Default)]
pub struct DatasetArgs {
    /// GeoJSON dataset, optionally tagged `PATH:PREFIX` (repeatable)
    #[arg(long = "dataset", value_name = "PATH[:PREFIX]")]
    pub datasets: Vec<DatasetSpec>,
}

#[derive(Parser, Debug)]
pub struct NearbyArgs {
    /// Reference latitude
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Reference longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Geocode this place (zip code or address) and use it as the reference
    #[arg(long, value_name = "TEXT", conflicts_with_all = ["lat", "lon"])]
    pub near: Option<String>,

    /// Only include locations whose name or address contains this text
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Distance unit (miles or kilometers)
    #[arg(long)]
    pub unit: Option<DistanceUnit>,

    #[command(flatten)]
    pub datasets: DatasetArgs,

    /// Store the resolved reference for later invocations
    #[arg(long)]
    pub remember: bool,

    /// Clear the stored reference before resolving
    #[arg(long, conflicts_with = "remember")]
    pub forget: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub datasets: DatasetArgs,
}
