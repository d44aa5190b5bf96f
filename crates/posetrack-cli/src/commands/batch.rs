use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use posetrack_core::batch::run_batch;

use super::load_calibration;

#[derive(Args)]
pub struct BatchArgs {
    /// Manifest CSV with a `path` column
    pub manifest: PathBuf,

    /// Output CSV (`point,x,y,z`)
    pub output: PathBuf,

    /// Calibration config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let config = load_calibration(args.config.as_deref())?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Processing [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let report = run_batch(&args.manifest, &args.output, &config, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })
    .with_context(|| format!("Batch over {} failed", args.manifest.display()))?;
    pb.finish();

    for row in &report.rows {
        println!(
            "Image {}: {} = ({:.4}, {:.4}, {:.4})",
            row.point, config.tracked_color, row.x, row.y, row.z
        );
    }
    for (index, reason) in &report.skipped {
        println!("Image {index}: skipped, {reason}");
    }
    println!(
        "Done. {} row(s) saved to {}",
        report.rows_written(),
        args.output.display()
    );
    Ok(())
}
