use std::collections::BTreeMap;

use image::RgbImage;
use ndarray::Array3;
use tracing::debug;

use crate::color::hsv::hsv_from_rgb;
use crate::geometry::PixelPoint;

use super::annotate::draw_marker;
use super::config::{ColorRange, DetectionConfig, DetectionMode};
use super::contour::{external_regions, Region};
use super::mask::color_mask;

/// Centroids found for one color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Detection {
    /// The largest region (single mode).
    Single(PixelPoint),
    /// Every region above the area threshold, in region order (multi mode).
    Multiple(Vec<PixelPoint>),
}

impl Detection {
    pub fn points(&self) -> &[PixelPoint] {
        match self {
            Self::Single(p) => std::slice::from_ref(p),
            Self::Multiple(ps) => ps,
        }
    }

    /// The single point, or the first one of a multi detection.
    pub fn primary(&self) -> Option<PixelPoint> {
        self.points().first().copied()
    }
}

/// Color name to detection. Undetected colors are absent.
pub type DetectionResult = BTreeMap<String, Detection>;

/// Detections plus the annotated copy of the input image.
#[derive(Clone, Debug)]
pub struct MarkerDetection {
    pub points: DetectionResult,
    pub annotated: RgbImage,
}

/// Detect every configured marker color in an RGB image.
pub fn detect_markers(image: &RgbImage, config: &DetectionConfig) -> MarkerDetection {
    let hsv = hsv_from_rgb(image);
    let mut annotated = image.clone();
    let mut points = DetectionResult::new();

    for color in &config.colors {
        let Some(detection) = detect_color(&hsv, color, config.min_area) else {
            debug!(color = %color.name, "No region detected");
            continue;
        };
        for &p in detection.points() {
            draw_marker(&mut annotated, p, &color.name);
            debug!(color = %color.name, x = p.x, y = p.y, "Marker detected");
        }
        points.insert(color.name.clone(), detection);
    }

    MarkerDetection { points, annotated }
}

/// Detect one color in an `(h, w, 3)` HSV array.
pub fn detect_color(hsv: &Array3<u8>, color: &ColorRange, min_area: f64) -> Option<Detection> {
    let mask = color_mask(hsv, &color.intervals);
    let regions = external_regions(&mask);

    match color.mode {
        DetectionMode::Multi => {
            let centroids: Vec<PixelPoint> = regions
                .iter()
                .filter(|r| r.area() > min_area)
                .filter_map(|r| r.moments.centroid())
                .collect();
            (!centroids.is_empty()).then_some(Detection::Multiple(centroids))
        }
        DetectionMode::Single => largest_region(&regions)
            .and_then(|r| r.moments.centroid())
            .map(Detection::Single),
    }
}

/// Region of maximum area; the first listed (bottom-most) one wins ties.
fn largest_region(regions: &[Region]) -> Option<&Region> {
    regions.iter().fold(None, |best, r| match best {
        Some(b) if b.area() >= r.area() => Some(b),
        _ => Some(r),
    })
}
