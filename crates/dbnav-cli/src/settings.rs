//! Locating and loading the generator settings file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dbnav_core::GeneratorConfig;

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("dbnav"))
}

pub fn default_config_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load settings from `explicit`, else the user config file, else the
/// embedded defaults.
///
/// An explicit path must exist; a missing user config file is not an error.
pub fn load(explicit: Option<&Path>) -> Result<GeneratorConfig> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    match default_config_file() {
        Ok(path) if path.exists() => load_file(&path),
        Ok(_) | Err(_) => {
            tracing::debug!("no user config file; using embedded defaults");
            Ok(GeneratorConfig::embedded()?)
        }
    }
}

fn load_file(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = GeneratorConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded generator config");
    Ok(config)
}
