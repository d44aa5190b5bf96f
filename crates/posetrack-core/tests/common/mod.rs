#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use posetrack_core::io::ser::SER_HEADER_SIZE;

pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const CELESTE: Rgb<u8> = Rgb([0, 255, 255]);
pub const PINK: Rgb<u8> = Rgb([255, 0, 255]);

/// Black image of the given size.
pub fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width, height)
}

/// Fill the inclusive pixel rectangle `x0..=x1`, `y0..=y1`.
pub fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Image with a green origin block centred on `green` and a red block
/// centred on `red`, both 7x7.
pub fn rig_image(green: (u32, u32), red: Option<(u32, u32)>) -> RgbImage {
    let mut img = blank(200, 200);
    fill_rect(&mut img, green.0 - 3, green.1 - 3, green.0 + 3, green.1 + 3, GREEN);
    if let Some((x, y)) = red {
        fill_rect(&mut img, x - 3, y - 3, x + 3, y + 3, RED);
    }
    img
}

/// Save `img` as PNG under `dir` and return its path.
pub fn save_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("write PNG");
    path
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 9=BAYER_GRBG, 10=BAYER_GBRG, 11=BAYER_BGGR,
///             100=RGB, 101=BGR
pub fn build_ser_header(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..3].copy_from_slice(b"Rig");
    buf.extend_from_slice(&observer);
    // Instrument (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // Telescope (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());
    // DateTimeUTC (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete SER file from raw frame bytes.
pub fn build_ser(width: u32, height: u32, bit_depth: u32, color_id: i32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, bit_depth, frames.len(), color_id);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Mono 8-bit SER whose frame `i` is filled with the value `i`.
pub fn build_counting_ser(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    let frames: Vec<Vec<u8>> = (0..num_frames)
        .map(|i| vec![i as u8; (width * height) as usize])
        .collect();
    build_ser(width, height, 8, 0, &frames)
}

/// Write a SER buffer to `dir/name` and return its path.
pub fn write_ser(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write SER data");
    path
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
