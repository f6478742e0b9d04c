pub mod builtin;

use crate::error::EngineError;
use crate::model::{MarkerShape, Unit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine tuning options. Every knob has a visible default; the embedded
/// profiles in `builtin` are complete examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit applied to dimensions without their own suffix.
    #[serde(default)]
    pub unit_default: Unit,
    /// A dimension is critical when its band width is below this fraction
    /// of the nominal value (and the band is non-empty).
    #[serde(default = "default_critical_fraction")]
    pub critical_tolerance_fraction: Decimal,
    /// Minimum clearance between a balloon and anything else, page units.
    #[serde(default = "default_clearance_margin")]
    pub placement_clearance_margin: f32,
    /// Candidate positions tried per balloon before falling back to the
    /// least-overlapping one.
    #[serde(default = "default_max_attempts")]
    pub placement_max_attempts: u32,
    /// Closed-loop shapes accepted as critical markers.
    #[serde(default = "default_marker_shapes")]
    pub critical_marker_shapes: Vec<MarkerShape>,
}

fn default_critical_fraction() -> Decimal {
    // 0.001 = one part per thousand of the nominal
    Decimal::new(1, 3)
}

fn default_clearance_margin() -> f32 {
    2.0
}

fn default_max_attempts() -> u32 {
    24
}

fn default_marker_shapes() -> Vec<MarkerShape> {
    vec![MarkerShape::Any]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            description: None,
            unit_default: Unit::default(),
            critical_tolerance_fraction: default_critical_fraction(),
            placement_clearance_margin: default_clearance_margin(),
            placement_max_attempts: default_max_attempts(),
            critical_marker_shapes: default_marker_shapes(),
        }
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| EngineError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<EngineConfig, EngineError> {
    let config: EngineConfig = serde_json::from_str(json).map_err(EngineError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is well-formed.
pub fn validate_config(config: &EngineConfig) -> Result<(), EngineError> {
    if config.critical_tolerance_fraction <= Decimal::ZERO
        || config.critical_tolerance_fraction >= Decimal::ONE
    {
        return Err(EngineError::ConfigInvalid(format!(
            "critical_tolerance_fraction must be between 0 and 1 (exclusive), got {}",
            config.critical_tolerance_fraction
        )));
    }

    if !(config.placement_clearance_margin.is_finite() && config.placement_clearance_margin >= 0.0)
    {
        return Err(EngineError::ConfigInvalid(format!(
            "placement_clearance_margin must be a finite non-negative number, got {}",
            config.placement_clearance_margin
        )));
    }

    if config.placement_max_attempts == 0 {
        return Err(EngineError::ConfigInvalid(
            "placement_max_attempts must be at least 1".into(),
        ));
    }

    if config.critical_marker_shapes.is_empty() {
        return Err(EngineError::ConfigInvalid(
            "critical_marker_shapes must not be empty".into(),
        ));
    }

    Ok(())
}
