//! Extraction of temporally equidistant frames from a video source.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::consts::{SAMPLE_FILE_EXTENSION, SAMPLE_FILE_PREFIX};
use crate::error::Result;
use crate::io::image_io::save_jpeg;
use crate::io::source::{open_source, FrameSource};

/// Outcome of a sampling run.
#[derive(Clone, Debug, Default)]
pub struct SampleReport {
    /// Frames available in the source.
    pub total_frames: usize,
    /// Captures asked for, before clamping.
    pub requested: usize,
    /// Frame indices that were targeted.
    pub indices: Vec<usize>,
    /// Files written, in index order.
    pub written: Vec<PathBuf>,
    /// Frame indices that could not be decoded or saved.
    pub failed: Vec<usize>,
}

impl SampleReport {
    /// Whether the requested count exceeded the frames available.
    pub fn was_clamped(&self) -> bool {
        self.requested > self.total_frames
    }
}

/// `count` frame indices evenly spaced over `0..=total-1`, truncated to
/// integers. Both endpoints are included when `count >= 2`; `count` is
/// clamped to `total`.
pub fn frame_indices(total: usize, count: usize) -> Vec<usize> {
    let count = count.min(total);
    match count {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let last = total - 1;
            let step = last as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        last
                    } else {
                        ((i as f64 * step) as usize).min(last)
                    }
                })
                .collect()
        }
    }
}

/// File name of the `n`-th capture (1-based): `captura_001.jpg`.
pub fn sample_file_name(n: usize) -> String {
    format!("{SAMPLE_FILE_PREFIX}_{n:03}.{SAMPLE_FILE_EXTENSION}")
}

/// Open `video` and write `count` equidistant frames into `output_folder`.
///
/// `progress` is called with `(done, total)` after every targeted frame.
pub fn sample_frames<F>(video: &Path, count: usize, output_folder: &Path, progress: F) -> Result<SampleReport>
where
    F: FnMut(usize, usize),
{
    let source = open_source(video)?;
    sample_from_source(source.as_ref(), count, output_folder, progress)
}

/// Write `count` equidistant frames of `source` into `output_folder`,
/// creating the folder if needed. Frames that fail to decode are skipped.
pub fn sample_from_source<F>(
    source: &dyn FrameSource,
    count: usize,
    output_folder: &Path,
    mut progress: F,
) -> Result<SampleReport>
where
    F: FnMut(usize, usize),
{
    std::fs::create_dir_all(output_folder)?;

    let total_frames = source.frame_count();
    info!(total_frames, "Video opened");
    if count > total_frames {
        info!(
            requested = count,
            total_frames, "Requested more captures than frames, clamping"
        );
    }

    let indices = frame_indices(total_frames, count);
    info!(?indices, "Frame indices to extract");

    let mut report = SampleReport {
        total_frames,
        requested: count,
        indices: indices.clone(),
        ..SampleReport::default()
    };

    for (i, &frame_idx) in indices.iter().enumerate() {
        let saved = source.read_frame(frame_idx).and_then(|frame| {
            let path = output_folder.join(sample_file_name(i + 1));
            save_jpeg(&frame.image, &path)?;
            Ok(path)
        });

        match saved {
            Ok(path) => {
                info!(frame = frame_idx, path = %path.display(), "Saved capture");
                report.written.push(path);
            }
            Err(e) => {
                warn!(frame = frame_idx, error = %e, "Failed to extract frame");
                report.failed.push(frame_idx);
            }
        }
        progress(i + 1, indices.len());
    }

    info!(written = report.written.len(), "Capture extraction complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(sample_file_name(1), "captura_001.jpg");
        assert_eq!(sample_file_name(42), "captura_042.jpg");
        assert_eq!(sample_file_name(1234), "captura_1234.jpg");
    }

    #[test]
    fn single_capture_takes_first_frame() {
        assert_eq!(frame_indices(50, 1), vec![0]);
    }

    #[test]
    fn no_frames_no_indices() {
        assert!(frame_indices(0, 5).is_empty());
        assert!(frame_indices(10, 0).is_empty());
    }
}
