use std::path::PathBuf;

use image::RgbImage;

/// A decoded video frame.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Zero-based index of the frame in its source.
    pub index: usize,
    /// 8-bit RGB pixels.
    pub image: RgbImage,
}

/// Color/Bayer mode of the source data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

/// Metadata about a frame source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    /// Frames per second, when the container records it.
    pub frame_rate: Option<f64>,
}
