//! Pixel offset to physical coordinate mapping.
//!
//! The coefficients come from an offline linear regression for one marker on
//! one camera/rig geometry; a different rig needs new coefficients.

use serde::{Deserialize, Serialize};

use crate::consts::{PHYSICAL_X_COEFFS, PHYSICAL_Y_COEFFS, PHYSICAL_Z_COEFFS};
use crate::geometry::PixelOffset;

/// Position in physical units (meters).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalCoordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl std::fmt::Display for PhysicalCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// Affine map from a pixel offset to a physical coordinate. Each axis is
/// `a*dx + b*dy + c` with `[a, b, c]` as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalCalibration {
    #[serde(default = "default_x")]
    pub x: [f64; 3],
    #[serde(default = "default_y")]
    pub y: [f64; 3],
    #[serde(default = "default_z")]
    pub z: [f64; 3],
}

fn default_x() -> [f64; 3] {
    PHYSICAL_X_COEFFS
}
fn default_y() -> [f64; 3] {
    PHYSICAL_Y_COEFFS
}
fn default_z() -> [f64; 3] {
    PHYSICAL_Z_COEFFS
}

impl Default for PhysicalCalibration {
    fn default() -> Self {
        Self {
            x: PHYSICAL_X_COEFFS,
            y: PHYSICAL_Y_COEFFS,
            z: PHYSICAL_Z_COEFFS,
        }
    }
}

impl PhysicalCalibration {
    pub fn to_physical(&self, offset: PixelOffset) -> PhysicalCoordinate {
        let (dx, dy) = (offset.dx as f64, offset.dy as f64);
        let apply = |[a, b, c]: [f64; 3]| a * dx + b * dy + c;
        PhysicalCoordinate {
            x: apply(self.x),
            y: apply(self.y),
            z: apply(self.z),
        }
    }
}

/// Map an offset with the default rig calibration.
pub fn to_physical(offset: PixelOffset) -> PhysicalCoordinate {
    PhysicalCalibration::default().to_physical(offset)
}
