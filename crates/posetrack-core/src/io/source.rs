use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{PoseTrackError, Result};
use crate::frame::{SourceInfo, VideoFrame};

use super::image_seq::ImageSequence;
use super::ser::{SerReader, SER_MAGIC};

/// A seekable sequence of video frames.
pub trait FrameSource {
    /// Total number of frames in the source.
    fn frame_count(&self) -> usize;

    /// Decode the frame at `index`.
    fn read_frame(&self, index: usize) -> Result<VideoFrame>;

    fn source_info(&self) -> SourceInfo;
}

/// Open a video source.
///
/// A directory is read as an image sequence and a `.ser` file (or any file
/// starting with the SER magic) as a SER capture. Every other file goes to
/// the GStreamer decoder, which needs the `gstreamer` feature.
///
/// Every failure is reported as [`PoseTrackError::SourceUnavailable`].
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    if !path.exists() {
        return Err(PoseTrackError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: "file does not exist".into(),
        });
    }

    let opened: Result<Box<dyn FrameSource>> = if path.is_dir() {
        ImageSequence::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>)
    } else if is_ser_file(path) {
        SerReader::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>)
    } else {
        open_video(path)
    };

    opened.map_err(|e| match e {
        PoseTrackError::SourceUnavailable { .. } => e,
        other => PoseTrackError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })
}

fn is_ser_file(path: &Path) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"));
    if by_extension {
        return true;
    }
    let mut magic = [0u8; 14];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut magic))
        .is_ok()
        && &magic == SER_MAGIC
}

#[cfg(feature = "gstreamer")]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>> {
    super::video::VideoFile::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>)
}

#[cfg(not(feature = "gstreamer"))]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>> {
    Err(PoseTrackError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: "not a SER capture; decoding other video formats requires the `gstreamer` feature"
            .into(),
    })
}
