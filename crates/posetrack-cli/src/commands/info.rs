use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use posetrack_core::io::open_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Input video (SER file, directory of frames, or any file GStreamer decodes)
    pub video: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = open_source(&args.video)?;
    let info = source.source_info();

    println!("Source:      {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Color mode:  {:?}", info.color_mode);

    if let Some(fps) = info.frame_rate {
        println!("Frame rate:  {fps:.2} fps");
    }

    Ok(())
}
