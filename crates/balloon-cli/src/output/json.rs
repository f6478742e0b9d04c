use balloon_core::error::EngineError;
use balloon_core::report::InspectionReport;

pub fn print(report: &InspectionReport) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
