use std::cell::RefCell;
use std::path::{Path, PathBuf};

use gst::prelude::*;
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::error::{PoseTrackError, Result};
use crate::frame::{ColorMode, SourceInfo, VideoFrame};

use super::source::FrameSource;

const PULL_TIMEOUT_SECS: u64 = 10;

/// A compressed video file decoded through GStreamer.
///
/// Frames are decoded in order. Reading an index behind the current
/// position restarts playback from the first frame, so ascending reads
/// decode the file once.
pub struct VideoFile {
    path: PathBuf,
    total_frames: usize,
    width: u32,
    height: u32,
    frame_rate: Option<f64>,
    playback: RefCell<Option<Playback>>,
}

impl VideoFile {
    /// Open `path` and count its frames with a full decoding pass.
    pub fn open(path: &Path) -> Result<Self> {
        gst::init().map_err(|e| video_err(format!("GStreamer init failed: {e}")))?;

        let mut playback = Playback::start(path)?;
        let mut format = None;
        let mut total_frames = 0usize;
        while let Some(sample) = playback.next_sample()? {
            if format.is_none() {
                format = Some(sample_format(&sample)?);
            }
            total_frames += 1;
        }
        let (width, height, frame_rate) =
            format.ok_or_else(|| video_err("no decodable video frames"))?;

        info!(
            path = %path.display(),
            total_frames,
            width,
            height,
            fps = frame_rate.unwrap_or(0.0),
            "Opened video"
        );

        Ok(Self {
            path: path.to_path_buf(),
            total_frames,
            width,
            height,
            frame_rate,
            playback: RefCell::new(None),
        })
    }
}

impl FrameSource for VideoFile {
    fn frame_count(&self) -> usize {
        self.total_frames
    }

    fn read_frame(&self, index: usize) -> Result<VideoFrame> {
        if index >= self.total_frames {
            return Err(PoseTrackError::FrameIndexOutOfRange {
                index,
                total: self.total_frames,
            });
        }

        let mut slot = self.playback.borrow_mut();
        let playback = match slot.take() {
            Some(p) if p.next_index <= index => slot.insert(p),
            stale => {
                drop(stale);
                debug!(index, "Restarting video playback");
                slot.insert(Playback::start(&self.path)?)
            }
        };

        while playback.next_index < index {
            if playback.next_sample()?.is_none() {
                return Err(video_err(format!("stream ended before frame {index}")));
            }
        }
        let sample = playback
            .next_sample()?
            .ok_or_else(|| video_err(format!("stream ended before frame {index}")))?;

        let (width, height, _) = sample_format(&sample)?;
        let image = sample_to_rgb(&sample, width, height)?;
        Ok(VideoFrame { index, image })
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo {
            filename: self.path.clone(),
            total_frames: self.total_frames,
            width: self.width,
            height: self.height,
            bit_depth: 8,
            color_mode: ColorMode::RGB,
            frame_rate: self.frame_rate,
        }
    }
}

struct Playback {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    next_index: usize,
}

impl Playback {
    fn start(path: &Path) -> Result<Self> {
        let location = if cfg!(windows) {
            path.to_string_lossy().replace('\\', "/")
        } else {
            path.to_string_lossy().into_owned()
        };
        let pipeline_str = format!(
            "filesrc location=\"{location}\" ! \
             decodebin ! \
             videoconvert ! \
             video/x-raw,format=RGB ! \
             appsink name=sink sync=false max-buffers=4 drop=false"
        );
        debug!(pipeline = %pipeline_str, "Starting video pipeline");

        let pipeline = gst::parse::launch(&pipeline_str)
            .map_err(|e| video_err(format!("failed to parse pipeline: {e}")))?
            .dynamic_cast::<gst::Pipeline>()
            .map_err(|_| video_err("top-level element is not a pipeline"))?;
        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| video_err("pipeline has no appsink"))?
            .dynamic_cast::<gst_app::AppSink>()
            .map_err(|_| video_err("sink element is not an appsink"))?;

        let playback = Self {
            pipeline,
            appsink,
            next_index: 0,
        };
        if playback.pipeline.set_state(gst::State::Playing).is_err() {
            return Err(playback.bus_error());
        }
        let (started, _, _) = playback
            .pipeline
            .state(gst::ClockTime::from_seconds(PULL_TIMEOUT_SECS));
        if started.is_err() {
            return Err(playback.bus_error());
        }
        Ok(playback)
    }

    /// Pull the next decoded sample, `None` at end of stream.
    fn next_sample(&mut self) -> Result<Option<gst::Sample>> {
        match self
            .appsink
            .try_pull_sample(gst::ClockTime::from_seconds(PULL_TIMEOUT_SECS))
        {
            Some(sample) => {
                self.next_index += 1;
                Ok(Some(sample))
            }
            None if self.appsink.is_eos() => Ok(None),
            None => Err(self.bus_error()),
        }
    }

    fn bus_error(&self) -> PoseTrackError {
        let detail = self
            .pipeline
            .bus()
            .and_then(|bus| bus.pop_filtered(&[gst::MessageType::Error]))
            .and_then(|msg| match msg.view() {
                gst::MessageView::Error(err) => Some(err.error().to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "pipeline stalled".to_string());
        video_err(detail)
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            warn!(error = %e, "Failed to stop video pipeline");
        }
    }
}

fn sample_format(sample: &gst::Sample) -> Result<(u32, u32, Option<f64>)> {
    let structure = sample
        .caps()
        .and_then(|caps| caps.structure(0))
        .ok_or_else(|| video_err("decoded sample has no caps"))?;
    let width = structure
        .get::<i32>("width")
        .map_err(|_| video_err("caps without width"))?;
    let height = structure
        .get::<i32>("height")
        .map_err(|_| video_err("caps without height"))?;
    let frame_rate = structure
        .get::<gst::Fraction>("framerate")
        .ok()
        .filter(|f| f.numer() > 0 && f.denom() > 0)
        .map(|f| f.numer() as f64 / f.denom() as f64);

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h, frame_rate)),
        _ => Err(PoseTrackError::InvalidDimensions {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
    }
}

/// Copy a packed RGB sample into an image, dropping row padding.
fn sample_to_rgb(sample: &gst::Sample, width: u32, height: u32) -> Result<RgbImage> {
    let buffer = sample
        .buffer()
        .ok_or_else(|| video_err("decoded sample has no buffer"))?;
    let map = buffer
        .map_readable()
        .map_err(|e| video_err(format!("unreadable buffer: {e}")))?;
    let data = map.as_slice();

    let row = width as usize * 3;
    let rows = height as usize;
    // RGB rows are padded to 4 bytes unless the buffer is tightly packed.
    let stride = if data.len() == row * rows {
        row
    } else {
        (row + 3) & !3
    };
    if data.len() < stride * (rows - 1) + row {
        return Err(video_err(format!(
            "buffer of {} bytes too small for {width}x{height} RGB",
            data.len()
        )));
    }

    let mut pixels = Vec::with_capacity(row * rows);
    for line in data.chunks(stride).take(rows) {
        pixels.extend_from_slice(&line[..row]);
    }
    RgbImage::from_raw(width, height, pixels)
        .ok_or(PoseTrackError::InvalidDimensions { width, height })
}

fn video_err(msg: impl Into<String>) -> PoseTrackError {
    PoseTrackError::Video(msg.into())
}
