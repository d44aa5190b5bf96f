use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use posetrack_core::consts::DEFAULT_SAMPLE_FOLDER;
use posetrack_core::error::PoseTrackError;
use posetrack_core::io::open_source;
use posetrack_core::sampling::sample_from_source;

#[derive(Args)]
pub struct SampleArgs {
    /// Input video (SER file, directory of frames, or any file GStreamer decodes)
    pub video: PathBuf,

    /// Number of captures to extract
    pub num: usize,

    /// Output folder for the captures
    #[arg(long, default_value = DEFAULT_SAMPLE_FOLDER)]
    pub output: PathBuf,
}

pub fn run(args: &SampleArgs) -> Result<()> {
    let source = match open_source(&args.video) {
        Ok(source) => source,
        Err(e @ PoseTrackError::SourceUnavailable { .. }) => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let total = source.frame_count();
    println!("Total frames in video: {total}");
    if args.num > total {
        println!("Requested {} captures but the video has {total} frames, clamping", args.num);
    }

    let pb = ProgressBar::new(args.num.min(total) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Extracting [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let report = sample_from_source(source.as_ref(), args.num, &args.output, |done, _total| {
        pb.set_position(done as u64);
    })?;
    pb.finish();

    println!("Frame indices: {:?}", report.indices);
    for path in &report.written {
        println!("Saved {}", path.display());
    }
    for idx in &report.failed {
        println!("Failed to read frame {idx}");
    }
    println!("Capture extraction complete.");
    Ok(())
}
