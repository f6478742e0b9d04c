use crate::config::{validate_config, EngineConfig};
use crate::error::EngineError;

const DEFAULT_PROFILE_JSON: &str = include_str!("../../../../profiles/default.json");
const STRICT_PROFILE_JSON: &str = include_str!("../../../../profiles/strict.json");

/// Available embedded config profiles.
pub const PROFILES: &[&str] = &["default", "strict"];

/// Load an embedded profile by name.
pub fn load_profile(name: &str) -> Result<EngineConfig, EngineError> {
    let json = match name {
        "default" => DEFAULT_PROFILE_JSON,
        "strict" => STRICT_PROFILE_JSON,
        _ => {
            return Err(EngineError::ConfigInvalid(format!(
                "unknown profile '{}'. Available: {}",
                name,
                PROFILES.join(", ")
            )))
        }
    };
    let config: EngineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}
