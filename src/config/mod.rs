//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a patch from a YAML or JSON file (chosen by extension, YAML otherwise)
pub fn load_config(path: &Path) -> Result<PatchConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {:?}", path))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: PatchConfig = if is_json {
        serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {:?}", path))?
    } else {
        serde_yaml::from_str(&contents).with_context(|| format!("invalid YAML in {:?}", path))?
    };

    config.validate()?;
    Ok(config)
}
