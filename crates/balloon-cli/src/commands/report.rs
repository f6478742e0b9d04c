use balloon_core::config::{self, builtin, EngineConfig};
use balloon_core::error::EngineError;
use balloon_core::geometry::json::JsonSource;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    config_file: Option<PathBuf>,
    profile: Option<String>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), EngineError> {
    // Config resolution: explicit file, then embedded profile, then defaults
    let config: EngineConfig = match (config_file, profile) {
        (Some(_), Some(_)) => {
            return Err(EngineError::ConfigInvalid(
                "pass either --config or --profile, not both".into(),
            ))
        }
        (Some(path), None) => config::load_config(&path)?,
        (None, Some(name)) => builtin::load_profile(&name)?,
        (None, None) => EngineConfig::default(),
    };

    let bytes = std::fs::read(&input_file)?;
    let report = balloon_core::build_report(&bytes, &JsonSource, &config)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "{} balloon(s) across {} page(s), written to {}",
                report.rows.len(),
                report.pages.len(),
                path.display()
            );
            if !report.review.is_empty() {
                eprintln!("  {} item(s) marked for manual review", report.review.len());
            }
            for failure in &report.page_failures {
                eprintln!("  page {} failed: {}", failure.page_index, failure.reason);
            }
        }
        None => match output_format {
            "json" => output::json::print(&report)?,
            _ => output::table::print(&report),
        },
    }

    Ok(())
}
