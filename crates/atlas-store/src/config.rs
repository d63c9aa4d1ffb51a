use std::path::Path;

use atlas_core::MapConfig;

use crate::error::{Result, StoreError};

/// Load a TOML config. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<MapConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: MapConfig = toml::from_str(&content)?;
    config.validate()?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

pub fn to_toml(config: &MapConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| StoreError::InvalidData(format!("config does not serialize to TOML: {e}")))
}
