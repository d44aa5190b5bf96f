pub mod batch;
pub mod config;
pub mod detect;
pub mod info;
pub mod sample;

use std::path::Path;

use anyhow::{Context, Result};
use posetrack_core::calibration::CalibrationConfig;

/// Load the calibration from a TOML file, or use the built-in rig defaults.
pub fn load_calibration(path: Option<&Path>) -> Result<CalibrationConfig> {
    match path {
        Some(path) => CalibrationConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(CalibrationConfig::default()),
    }
}
