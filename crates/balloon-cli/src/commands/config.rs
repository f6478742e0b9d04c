use balloon_core::config::{self, builtin};
use balloon_core::error::EngineError;
use balloon_core::model::MarkerShape;
use std::path::Path;

pub fn list() -> Result<(), EngineError> {
    println!("Available config profiles:\n");
    for name in builtin::PROFILES {
        let profile = builtin::load_profile(name)?;
        println!(
            "  {:<8} critical below {} x nominal, clearance {}, {} placement attempt(s)",
            name,
            profile.critical_tolerance_fraction,
            profile.placement_clearance_margin,
            profile.placement_max_attempts
        );
        if let Some(ref desc) = profile.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(name: &str) -> Result<(), EngineError> {
    let profile = builtin::load_profile(name)?;
    let json = serde_json::to_string_pretty(&profile)?;
    println!("{json}");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), EngineError> {
    let config = config::load_config(file)?;

    println!("Config '{}' is valid.", file.display());
    println!("  Default unit: {}", config.unit_default);
    println!(
        "  Critical band: below {} x nominal",
        config.critical_tolerance_fraction
    );
    println!(
        "  Placement: {} attempt(s), {} unit clearance",
        config.placement_max_attempts, config.placement_clearance_margin
    );
    let shapes: Vec<String> = config
        .critical_marker_shapes
        .iter()
        .map(|s| s.to_string())
        .collect();
    println!("  Marker shapes: {}", shapes.join(", "));

    // Check for potential issues (warnings, not errors)
    if config.critical_marker_shapes.contains(&MarkerShape::Any)
        && config.critical_marker_shapes.len() > 1
    {
        println!("\nWarnings:");
        println!("  - marker shape 'any' already accepts every closed loop; the other listed shapes are redundant");
    }

    Ok(())
}
