//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod report;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::debug;

use cruisecmp_core::ScanConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cruisecmp")
        .join("config.json")
}

/// Resolve the configuration file: explicit `--config`, else the default path.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicit path must exist.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ScanConfig> {
    if let Some(path) = explicit {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(ScanConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ScanConfig::from_file(&path)?)
    } else {
        Ok(ScanConfig::default())
    }
}

/// Turn `[l1, r1, l2, r2, ...]` from `--compare` into pairs.
pub fn compare_pairs(values: &[String]) -> Vec<(String, String)> {
    values
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}
