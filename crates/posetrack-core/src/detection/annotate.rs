use std::collections::BTreeMap;
use std::sync::OnceLock;

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut};
use tracing::warn;

use crate::consts::{
    LABEL_TEXT_SCALE, MARKER_DOT_RADIUS, MARKER_LABEL_OFFSET, OFFSET_LABEL_RISE,
    PHYSICAL_LABEL_RISE,
};
use crate::geometry::PixelPoint;
use crate::physical::PhysicalCoordinate;
use crate::relative::Offset;

use super::marker::DetectionResult;

pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const OFFSET_LABEL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const PHYSICAL_LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

static LABEL_FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSansMono-Bold.ttf");

fn label_font() -> Option<&'static FontRef<'static>> {
    static FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();
    FONT.get_or_init(|| match FontRef::try_from_slice(LABEL_FONT_DATA) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(error = %e, "Label font unusable, text labels disabled");
            None
        }
    })
    .as_ref()
}

/// Draw `text` with the left end of its baseline at `anchor`.
pub fn draw_label(img: &mut RgbImage, text: &str, anchor: (i32, i32), color: Rgb<u8>) {
    let Some(font) = label_font() else {
        return;
    };
    let scale = PxScale::from(LABEL_TEXT_SCALE);
    let ascent = font.as_scaled(scale).ascent().round() as i32;
    draw_text_mut(img, color, anchor.0, anchor.1 - ascent, scale, font, text);
}

/// Draw a filled dot on `point` and the color name below-right of it.
pub fn draw_marker(img: &mut RgbImage, point: PixelPoint, name: &str) {
    draw_filled_circle_mut(img, (point.x, point.y), MARKER_DOT_RADIUS, MARKER_COLOR);
    draw_label(
        img,
        name,
        (point.x + MARKER_LABEL_OFFSET, point.y + MARKER_LABEL_OFFSET),
        MARKER_COLOR,
    );
}

/// Write `color:(dx,dy)` above every detected point that has an offset.
pub fn draw_offset_labels(
    img: &mut RgbImage,
    detections: &DetectionResult,
    offsets: &BTreeMap<String, Offset>,
) {
    for (color, offset) in offsets {
        let Some(detection) = detections.get(color) else {
            continue;
        };
        for (p, o) in detection.points().iter().zip(offset.offsets()) {
            draw_label(
                img,
                &format!("{color}:({},{})", o.dx, o.dy),
                (p.x + MARKER_LABEL_OFFSET, p.y - OFFSET_LABEL_RISE),
                OFFSET_LABEL_COLOR,
            );
        }
    }
}

/// Write the physical position of `color` above its marker.
pub fn draw_physical_label(
    img: &mut RgbImage,
    point: PixelPoint,
    color: &str,
    coord: &PhysicalCoordinate,
) {
    draw_label(
        img,
        &format!("Phys{}:{coord}", capitalize(color)),
        (point.x + MARKER_LABEL_OFFSET, point.y - PHYSICAL_LABEL_RISE),
        PHYSICAL_LABEL_COLOR,
    );
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
