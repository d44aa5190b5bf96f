use image::RgbImage;
use ndarray::Array3;

use crate::consts::{HUE_MAX, HUE_STEPS};

/// Convert one RGB pixel to HSV in OpenCV's 8-bit convention:
/// H in `0..=179` (degrees / 2), S and V in `0..=255`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as u32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        ((delta * 255 + max as u32 / 2) / max as u32) as u8
    };

    if delta == 0 {
        return [0, s, v];
    }

    let (r, g, b, delta) = (r as f32, g as f32, b as f32, delta as f32);
    let degrees = if max as f32 == r {
        60.0 * (g - b) / delta
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

    let h = (degrees * HUE_STEPS / 360.0).round();
    let h = if h > HUE_MAX as f32 { h - HUE_STEPS } else { h };

    [h as u8, s, v]
}

/// Convert an RGB image to an HSV array of shape `(height, width, 3)`.
pub fn hsv_from_rgb(img: &RgbImage) -> Array3<u8> {
    let (w, h) = img.dimensions();
    let mut hsv = Array3::<u8>::zeros((h as usize, w as usize, 3));

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let [hh, ss, vv] = rgb_to_hsv(r, g, b);
        let (row, col) = (y as usize, x as usize);
        hsv[[row, col, 0]] = hh;
        hsv[[row, col, 1]] = ss;
        hsv[[row, col, 2]] = vv;
    }

    hsv
}
