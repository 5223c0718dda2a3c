//! Nearby command implementation

use crate::cli::NearbyArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::output_types::NearbyOutput;
use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use std::path::Path;
use tabled::Tabled;
use tapfinder_core::config::{CliConfigOverrides, LayeredConfig};
use tapfinder_core::formats::load_datasets;
use tapfinder_core::geocoding::{build_geocoder, reference_label, select_candidate, Geocoder};
use tapfinder_core::preference::{
    resolve_reference, JsonFilePreferenceStore, PreferenceStore, StoredPreference,
};
use tapfinder_core::{nearby_preview, rank, RankOptions, ReferenceLocation, ReferenceSource};

pub async fn execute(args: NearbyArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides {
            distance_unit: args.unit,
            max_results: args.limit,
            datasets: args.datasets.datasets,
            ..Default::default()
        },
    )?;

    let store = JsonFilePreferenceStore::new(&config.preference_file.value);

    if args.forget {
        store.clear().context("Failed to clear stored location")?;
        let has_other_input = args.lat.is_some() || args.near.is_some() || args.query.is_some();
        if !has_other_input {
            output.success("Forgot stored location");
            return Ok(());
        }
        output.info("Forgot stored location");
    }

    let points = load_datasets(&config.datasets.value)?;

    let explicit = match (args.lat, args.lon, args.near.as_deref()) {
        (Some(lat), Some(lon), _) => {
            let reference = ReferenceLocation::new(lat, lon, ReferenceSource::Geolocation)
                .with_label("you");
            if !reference.is_valid() {
                bail!("Coordinates out of range: {}, {}", lat, lon);
            }
            Some(reference)
        }
        (_, _, Some(place)) => Some(geocode_place(&config, place).await?),
        _ => None,
    };

    let max_age = Duration::try_days(config.preference_max_age_days.value).with_context(|| {
        format!("preference_max_age_days out of range: {}", config.preference_max_age_days.value)
    })?;

    let stored = store.load()?;
    let resolved = resolve_reference(
        explicit,
        stored.as_ref(),
        config.default_reference.value.as_ref(),
        Utc::now(),
        max_age,
    );

    if resolved.stored_expired {
        store.clear()?;
        output.info("Stored location expired and was cleared");
    }

    if args.remember {
        match &resolved.reference {
            Some(reference) if reference.source != ReferenceSource::Persisted => {
                store.save(&StoredPreference::from_reference(reference, Utc::now()))?;
                output.info(format!("Remembered location in {}", store.path().display()));
            }
            Some(_) => {}
            None => output.warning("No location to remember"),
        }
    }

    let mut options = RankOptions::new(config.max_results.value, config.distance_unit.value);
    if let Some(reference) = resolved.reference.clone() {
        options = options.with_reference(reference);
    }
    if let Some(query) = &args.query {
        options = options.with_text_query(query.clone());
    }

    let results = rank(&points, &options);
    let nearby = nearby_preview(&results, config.nearby_preview.value);

    if output.is_json() {
        return output.result(NearbyOutput {
            reference: resolved.reference,
            unit: options.unit,
            results,
            nearby,
        });
    }

    match &resolved.reference {
        Some(reference) => output.section(format!(
            "Nearest to {} ({:.4}, {:.4})",
            reference.label.as_deref().unwrap_or("reference"),
            reference.latitude,
            reference.longitude
        )),
        None if options.normalized_query().is_some() => output.section("Matching locations"),
        None => {
            output.warning("No location given. Pass --lat/--lon, --near, or a --query");
            return Ok(());
        }
    }

    #[derive(Tabled)]
    struct ResultRow {
        #[tabled(rename = "#")]
        rank: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Address")]
        address: String,
        #[tabled(rename = "Distance")]
        distance: String,
    }

    let unit = options.unit.abbreviation();
    let rows: Vec<ResultRow> = results
        .iter()
        .enumerate()
        .map(|(i, r)| ResultRow {
            rank: i + 1,
            name: r.point.name.clone(),
            category: r.point.category.to_string(),
            address: r.point.address.clone(),
            distance: r.distance.map(|d| format!("{:.1} {}", d, unit)).unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    output.table(rows);
    Ok(())
}

/// Geocode `--near` text into a search reference
async fn geocode_place(config: &LayeredConfig, place: &str) -> Result<ReferenceLocation> {
    let geocoder = build_geocoder(
        config.geocoder.value,
        &config.region.value,
        config.mapbox_token.value.as_deref(),
    )?;

    let candidates = geocoder
        .geocode(place)
        .await
        .with_context(|| format!("Failed to geocode '{}'", place))?;

    let Some(candidate) = select_candidate(&candidates, &config.region.value) else {
        bail!("Could not find '{}' in region {}", place, config.region.value);
    };

    tracing::info!(place, label = %candidate.label, "Resolved reference location");
    Ok(ReferenceLocation::new(candidate.latitude, candidate.longitude, ReferenceSource::Search)
        .with_label(reference_label(place)))
}
