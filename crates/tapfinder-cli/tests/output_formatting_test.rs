//! Integration tests for the tapfinder binary
//!
//! These tests run the compiled CLI against temporary datasets and verify
//! JSON output, ranking order, and stored-location handling.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const STORES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [-80.14, 40.79] },
      "properties": { "Name": "Beta Tavern", "address": "9 Route 19", "customerType": "On-Premise", "id": 2, "uniqueId": "2" }
    },
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [-79.96, 40.46] },
      "properties": { "Name": "Alpha Market", "address": "1 Butler St", "customerType": "Retail", "id": 1, "uniqueId": "1" }
    }
  ]
}"#;

fn tapfinder_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tapfinder"))
}

/// A scratch directory holding one dataset; commands run inside it
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stores.geojson"), STORES).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn preference_file(&self) -> PathBuf {
        self.path().join("preference.json")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(tapfinder_bin());
        command
            .args(args)
            .current_dir(self.path())
            .env("TAPFINDER_PREFERENCE_FILE", self.preference_file())
            .env("RUST_LOG", "off")
            .env_remove("TAPFINDER_MAX_RESULTS")
            .env_remove("TAPFINDER_DISTANCE_UNIT")
            .env_remove("TAPFINDER_PREFERENCE_MAX_AGE_DAYS");
        command
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute command")
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).expect("Output should be valid JSON")
    }
}

#[test]
fn test_nearby_json_is_sorted_by_distance() {
    let ws = Workspace::new();
    let parsed = ws.run_json(&[
        "--json", "nearby", "--lat", "40.44", "--lon", "-80.00", "--dataset", "stores.geojson",
    ]);

    assert_eq!(parsed["status"], "success");
    let results = parsed["data"]["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "Alpha Market");
    assert_eq!(results[1]["name"], "Beta Tavern");
    assert!(results[0]["distance"].as_f64().unwrap() < results[1]["distance"].as_f64().unwrap());
    assert_eq!(parsed["data"]["nearby"].as_array().unwrap().len(), 2);
}

#[test]
fn test_nearby_limit_and_unit() {
    let ws = Workspace::new();
    let parsed = ws.run_json(&[
        "--json", "nearby", "--lat", "40.46", "--lon", "-79.96", "--limit", "1", "--unit", "km",
        "--dataset", "stores.geojson:pgh",
    ]);

    let results = parsed["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "pgh_1_1");
    assert_eq!(results[0]["distance"].as_f64(), Some(0.0));
    assert_eq!(parsed["data"]["unit"], "Kilometers");
}

#[test]
fn test_query_without_location_keeps_file_order() {
    let ws = Workspace::new();
    let parsed = ws.run_json(&["--json", "nearby", "--query", "a", "--dataset", "stores.geojson"]);

    let results = parsed["data"]["results"].as_array().unwrap();
    assert_eq!(results[0]["name"], "Beta Tavern");
    assert!(results[0]["distance"].is_null());
    assert!(parsed["data"]["nearby"].as_array().unwrap().is_empty());
}

#[test]
fn test_remember_then_reuse_and_forget() {
    let ws = Workspace::new();

    ws.run_json(&[
        "--json", "nearby", "--lat", "40.79", "--lon", "-80.14", "--remember", "--dataset",
        "stores.geojson",
    ]);
    assert!(ws.preference_file().exists(), "preference should be stored");

    let parsed = ws.run_json(&["--json", "nearby", "--dataset", "stores.geojson"]);
    assert_eq!(parsed["data"]["reference"]["source"], "persisted");
    assert_eq!(parsed["data"]["results"][0]["name"], "Beta Tavern");

    let output = ws.run(&["nearby", "--forget"]);
    assert!(output.status.success());
    assert!(!ws.preference_file().exists(), "preference should be cleared");
}

#[test]
fn test_config_command_reports_sources() {
    let ws = Workspace::new();
    fs::write(ws.path().join("tapfinder.toml"), "max_results = 7\n").unwrap();

    let parsed = ws.run_json(&["--json", "config"]);
    let values = parsed["data"]["values"].as_array().unwrap();
    let max_results = values.iter().find(|v| v["key"] == "max_results").expect("max_results");
    assert_eq!(max_results["value"], "7");
    assert_eq!(max_results["source"], "File");
}

#[test]
fn test_inspect_summary() {
    let ws = Workspace::new();
    let parsed = ws.run_json(&["--json", "inspect", "--dataset", "stores.geojson"]);

    let summary = &parsed["data"]["summary"];
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["with_coordinates"], 2);
    assert_eq!(summary["by_category"]["Retail"], 1);
}

#[test]
fn test_missing_dataset_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["nearby", "--lat", "40.0", "--lon", "-80.0", "--dataset", "missing.geojson"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.geojson"));
}

#[test]
fn test_huge_preference_age_does_not_crash() {
    let ws = Workspace::new();
    let args = ["--json", "nearby", "--lat", "40", "--lon", "-80", "--dataset", "stores.geojson"];

    let output = ws
        .command(&args)
        .env("TAPFINDER_PREFERENCE_MAX_AGE_DAYS", "200000000000000")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    fs::write(ws.path().join("tapfinder.toml"), "preference_max_age_days = 200000000000000\n").unwrap();
    let output = ws.run(&args);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("preference_max_age_days"));
}
