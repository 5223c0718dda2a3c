//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::output_types::InspectOutput;
use anyhow::Result;
use std::path::Path;
use tabled::Tabled;
use tapfinder_core::config::CliConfigOverrides;
use tapfinder_core::formats::load_datasets;
use tapfinder_core::models::DatasetSummary;

pub fn execute(args: InspectArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides { datasets: args.datasets.datasets, ..Default::default() },
    )?;

    let specs = &config.datasets.value;
    let points = load_datasets(specs)?;
    let summary = DatasetSummary::from_points(&points);

    if output.is_json() {
        return output.result(InspectOutput {
            datasets: specs.iter().map(|s| s.path.display().to_string()).collect(),
            summary,
        });
    }

    output.section("Datasets");
    for spec in specs {
        match &spec.prefix {
            Some(prefix) => output.kv(spec.path.display(), format!("prefix {}", prefix)),
            None => output.kv(spec.path.display(), "no prefix"),
        }
    }

    output.section("Locations");
    output.kv("Total", summary.total);
    output.kv("With coordinates", summary.with_coordinates);
    if summary.missing_coordinates() > 0 {
        output.warning(format!(
            "{} locations have no usable coordinates and will never be ranked",
            summary.missing_coordinates()
        ));
    }
    if let Some([min_lon, min_lat, max_lon, max_lat]) = summary.bbox {
        output.kv(
            "Bounding box",
            format!("{:.4}, {:.4} to {:.4}, {:.4}", min_lat, min_lon, max_lat, max_lon),
        );
    }

    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Count")]
        count: usize,
    }

    output.section("Categories");
    output.table(
        summary
            .by_category
            .iter()
            .map(|(category, count)| CategoryRow {
                category: if category.is_empty() { "(none)".to_string() } else { category.clone() },
                count: *count,
            })
            .collect(),
    );

    Ok(())
}
