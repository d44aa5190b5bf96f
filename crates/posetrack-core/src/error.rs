use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoseTrackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Video source {} unavailable: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Video decoding failed: {0}")]
    Video(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Origin marker '{0}' not detected")]
    MissingOrigin(String),

    #[error("Origin marker '{color}' detected {count} times, expected exactly one")]
    AmbiguousOrigin { color: String, count: usize },

    #[error("Invalid calibration config: {0}")]
    Config(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PoseTrackError>;
