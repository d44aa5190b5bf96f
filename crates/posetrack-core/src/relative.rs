//! Marker positions relative to the origin marker.

use std::collections::BTreeMap;

use crate::detection::{Detection, DetectionResult};
use crate::error::{PoseTrackError, Result};
use crate::geometry::PixelOffset;

/// Offsets of one color, shaped like its [`Detection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Offset {
    Single(PixelOffset),
    Multiple(Vec<PixelOffset>),
}

impl Offset {
    pub fn offsets(&self) -> &[PixelOffset] {
        match self {
            Self::Single(o) => std::slice::from_ref(o),
            Self::Multiple(os) => os,
        }
    }

    /// The single offset, or the first one of a multi detection.
    pub fn primary(&self) -> Option<PixelOffset> {
        self.offsets().first().copied()
    }
}

/// Offset of every detected color relative to `origin`'s centroid.
///
/// The origin itself is not part of the result. Fails with
/// [`PoseTrackError::MissingOrigin`] when the origin was not detected and
/// [`PoseTrackError::AmbiguousOrigin`] when it was detected in multi mode.
pub fn relative_offsets(
    detections: &DetectionResult,
    origin: &str,
) -> Result<BTreeMap<String, Offset>> {
    let base = match detections.get(origin) {
        None => return Err(PoseTrackError::MissingOrigin(origin.to_string())),
        Some(Detection::Single(p)) => *p,
        Some(Detection::Multiple(ps)) => {
            return Err(PoseTrackError::AmbiguousOrigin {
                color: origin.to_string(),
                count: ps.len(),
            })
        }
    };

    Ok(detections
        .iter()
        .filter(|(name, _)| name.as_str() != origin)
        .map(|(name, detection)| {
            let offset = match detection {
                Detection::Single(p) => Offset::Single(*p - base),
                Detection::Multiple(ps) => Offset::Multiple(ps.iter().map(|&p| p - base).collect()),
            };
            (name.clone(), offset)
        })
        .collect())
}
