use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use posetrack_core::detection::{detect_markers, draw_offset_labels, draw_physical_label};
use posetrack_core::error::PoseTrackError;
use posetrack_core::io::image_io::{load_rgb, save_image};
use posetrack_core::relative::relative_offsets;

use super::load_calibration;
use crate::summary;

#[derive(Args)]
pub struct DetectArgs {
    /// Input image
    pub image: PathBuf,

    /// Calibration config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the annotated image to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let config = load_calibration(args.config.as_deref())?;
    let image = match load_rgb(&args.image) {
        Ok(image) => image,
        Err(e @ (PoseTrackError::MissingInput { .. } | PoseTrackError::ImageError(_))) => {
            println!("Error loading image {}: {e}", args.image.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load image {}", args.image.display()))
        }
    };

    let mut detection = detect_markers(&image, &config.detection);
    summary::print_detections(&detection.points);

    match relative_offsets(&detection.points, &config.origin_color) {
        Ok(offsets) => {
            summary::print_offsets(&config.origin_color, &offsets);
            draw_offset_labels(&mut detection.annotated, &detection.points, &offsets);

            let tracked = &config.tracked_color;
            let offset = offsets.get(tracked).and_then(|o| o.primary());
            let point = detection.points.get(tracked).and_then(|d| d.primary());
            match (offset, point) {
                (Some(offset), Some(point)) => {
                    let coord = config.mapping.to_physical(offset);
                    summary::print_physical(tracked, &coord);
                    draw_physical_label(&mut detection.annotated, point, tracked, &coord);
                }
                _ => println!("{tracked} marker not detected"),
            }
        }
        Err(e) => println!("{e}"),
    }

    if let Some(ref path) = args.output {
        save_image(&detection.annotated, path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        println!("Annotated image saved to {}", path.display());
    }

    Ok(())
}
