use std::path::{Path, PathBuf};

use crate::consts::IMAGE_SEQUENCE_EXTENSIONS;
use crate::error::{PoseTrackError, Result};
use crate::frame::{ColorMode, SourceInfo, VideoFrame};

use super::image_io::load_rgb;
use super::source::FrameSource;

/// A directory of still images played back as a video, ordered by file name.
pub struct ImageSequence {
    dir: PathBuf,
    frames: Vec<PathBuf>,
}

impl ImageSequence {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            return Err(PoseTrackError::SourceUnavailable {
                path: dir.to_path_buf(),
                reason: "directory contains no image frames".into(),
            });
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
        })
    }

    pub fn frame_paths(&self) -> &[PathBuf] {
        &self.frames
    }
}

impl FrameSource for ImageSequence {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn read_frame(&self, index: usize) -> Result<VideoFrame> {
        let path = self
            .frames
            .get(index)
            .ok_or(PoseTrackError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })?;
        Ok(VideoFrame {
            index,
            image: load_rgb(path)?,
        })
    }

    /// Dimensions are taken from the first frame without decoding it fully.
    fn source_info(&self) -> SourceInfo {
        let (width, height) = image::image_dimensions(&self.frames[0]).unwrap_or((0, 0));
        SourceInfo {
            filename: self.dir.clone(),
            total_frames: self.frames.len(),
            width,
            height,
            bit_depth: 8,
            color_mode: ColorMode::RGB,
            frame_rate: None,
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_SEQUENCE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
