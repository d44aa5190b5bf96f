use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ORIGIN_COLOR, DEFAULT_TRACKED_COLOR};
use crate::detection::{DetectionConfig, DetectionMode};
use crate::error::{PoseTrackError, Result};
use crate::physical::PhysicalCalibration;

/// Everything a detection entry point needs for one rig: the marker color
/// table, which marker is the origin, which one is tracked, and the
/// pixel-to-physical map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "default_origin")]
    pub origin_color: String,
    #[serde(default = "default_tracked")]
    pub tracked_color: String,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub mapping: PhysicalCalibration,
}

fn default_origin() -> String {
    DEFAULT_ORIGIN_COLOR.to_string()
}
fn default_tracked() -> String {
    DEFAULT_TRACKED_COLOR.to_string()
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            origin_color: default_origin(),
            tracked_color: default_tracked(),
            detection: DetectionConfig::default(),
            mapping: PhysicalCalibration::default(),
        }
    }
}

impl CalibrationConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PoseTrackError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| PoseTrackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PoseTrackError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;

        let origin = self.detection.color(&self.origin_color).ok_or_else(|| {
            PoseTrackError::Config(format!(
                "origin color '{}' is not in the color table",
                self.origin_color
            ))
        })?;
        if origin.mode != DetectionMode::Single {
            return Err(PoseTrackError::Config(format!(
                "origin color '{}' must use single detection",
                self.origin_color
            )));
        }
        if self.detection.color(&self.tracked_color).is_none() {
            return Err(PoseTrackError::Config(format!(
                "tracked color '{}' is not in the color table",
                self.tracked_color
            )));
        }
        if self.tracked_color == self.origin_color {
            return Err(PoseTrackError::Config(
                "tracked color must differ from the origin color".into(),
            ));
        }
        Ok(())
    }
}
