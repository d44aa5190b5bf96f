use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MULTI_MIN_AREA;
use crate::error::{PoseTrackError, Result};

/// Closed HSV interval in OpenCV's 8-bit convention (H in 0..=179).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvInterval {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvInterval {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Componentwise `lower <= hsv <= upper`.
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }

    pub fn is_ordered(&self) -> bool {
        (0..3).all(|c| self.lower[c] <= self.upper[c])
    }
}

/// How many regions a color reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Only the largest-area region.
    #[default]
    Single,
    /// Every region above the minimum area.
    Multi,
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// A named marker color: the union of its HSV intervals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub name: String,
    #[serde(default)]
    pub mode: DetectionMode,
    pub intervals: Vec<HsvInterval>,
}

impl ColorRange {
    pub fn new(name: &str, intervals: &[HsvInterval], mode: DetectionMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
            intervals: intervals.to_vec(),
        }
    }
}

/// Color table and thresholds for marker detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Contour area a multi-mode region must strictly exceed.
    #[serde(default = "default_min_area")]
    pub min_area: f64,
    /// Marker colors, detected in this order.
    #[serde(default = "default_colors")]
    pub colors: Vec<ColorRange>,
}

fn default_min_area() -> f64 {
    DEFAULT_MULTI_MIN_AREA
}

/// The marker set painted on the rig.
fn default_colors() -> Vec<ColorRange> {
    use DetectionMode::{Multi, Single};
    vec![
        ColorRange::new(
            "red",
            &[
                HsvInterval::new([0, 100, 100], [10, 255, 255]),
                HsvInterval::new([170, 100, 100], [179, 255, 255]),
            ],
            Single,
        ),
        ColorRange::new("pink", &[HsvInterval::new([140, 100, 100], [160, 255, 255])], Single),
        ColorRange::new("blue", &[HsvInterval::new([110, 100, 100], [130, 255, 255])], Single),
        ColorRange::new("white", &[HsvInterval::new([0, 0, 200], [180, 30, 255])], Single),
        ColorRange::new("celeste", &[HsvInterval::new([85, 100, 100], [95, 255, 255])], Multi),
        ColorRange::new("green", &[HsvInterval::new([50, 100, 100], [70, 255, 255])], Single),
    ]
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MULTI_MIN_AREA,
            colors: default_colors(),
        }
    }
}

impl DetectionConfig {
    pub fn color(&self, name: &str) -> Option<&ColorRange> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Check names are unique, every color has an interval and every
    /// interval is ordered.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for color in &self.colors {
            if !seen.insert(color.name.as_str()) {
                return Err(PoseTrackError::Config(format!(
                    "color '{}' defined twice",
                    color.name
                )));
            }
            if color.intervals.is_empty() {
                return Err(PoseTrackError::Config(format!(
                    "color '{}' has no HSV interval",
                    color.name
                )));
            }
            if let Some(bad) = color.intervals.iter().find(|i| !i.is_ordered()) {
                return Err(PoseTrackError::Config(format!(
                    "color '{}': lower {:?} exceeds upper {:?}",
                    color.name, bad.lower, bad.upper
                )));
            }
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(PoseTrackError::Config(format!(
                "min_area must be a non-negative number, got {}",
                self.min_area
            )));
        }
        Ok(())
    }
}
