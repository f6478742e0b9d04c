use balloon_core::config::EngineConfig;
use balloon_core::error::EngineError;
use balloon_core::geometry::json::JsonSource;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    page: Option<usize>,
    output_format: &str,
) -> Result<(), EngineError> {
    let bytes = std::fs::read(&input_file)?;
    let mut scan = balloon_core::scan_dimensions(&bytes, &JsonSource, &EngineConfig::default())?;

    if let Some(wanted) = page {
        scan.pages.retain(|p| p.page_index == wanted);
        scan.page_failures.retain(|f| f.page_index == wanted);
    }

    let output_str = match output_format {
        "json" => serde_json::to_string_pretty(&scan)?,
        _ => output::table::format_dims(&scan),
    };
    println!("{output_str}");

    Ok(())
}
