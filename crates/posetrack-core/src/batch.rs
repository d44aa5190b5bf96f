//! Batch resolution of the tracked marker's physical position over a
//! manifest of images.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::calibration::CalibrationConfig;
use crate::detection::detect_markers;
use crate::error::Result;
use crate::io::image_io::load_rgb;
use crate::io::table::{read_manifest, write_results, OutputRow};
use crate::physical::PhysicalCoordinate;

/// Why a manifest row produced no output.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchSkip {
    /// The image could not be opened or decoded.
    MissingInput { path: PathBuf, reason: String },
    /// A required marker was not found in the image.
    MarkerNotDetected { color: String },
}

impl std::fmt::Display for BatchSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput { path, reason } => {
                write!(f, "could not load {}: {reason}", path.display())
            }
            Self::MarkerNotDetected { color } => write!(f, "{color} marker not detected"),
        }
    }
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Rows written to the output table.
    pub rows: Vec<OutputRow>,
    /// Skipped manifest rows (1-based index) with the reason.
    pub skipped: Vec<(usize, BatchSkip)>,
}

impl BatchReport {
    pub fn rows_written(&self) -> usize {
        self.rows.len()
    }
}

/// Resolve the tracked marker's physical position in one image.
pub fn resolve_image(
    path: &Path,
    config: &CalibrationConfig,
) -> std::result::Result<PhysicalCoordinate, BatchSkip> {
    let image = load_rgb(path).map_err(|e| BatchSkip::MissingInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let detection = detect_markers(&image, &config.detection);
    let point_of = |color: &str| {
        detection
            .points
            .get(color)
            .and_then(|d| d.primary())
            .ok_or_else(|| BatchSkip::MarkerNotDetected {
                color: color.to_string(),
            })
    };

    let origin = point_of(&config.origin_color)?;
    let tracked = point_of(&config.tracked_color)?;
    Ok(config.mapping.to_physical(tracked - origin))
}

/// Process every image listed in `manifest` and write the results table to
/// `output`.
///
/// Output rows keep their 1-based manifest index, so skipped rows leave gaps.
/// The table is written once, after all rows; a manifest that cannot be read
/// aborts the run before anything is written. `progress` is called with
/// `(done, total)` after every row.
pub fn run_batch<F>(
    manifest: &Path,
    output: &Path,
    config: &CalibrationConfig,
    mut progress: F,
) -> Result<BatchReport>
where
    F: FnMut(usize, usize),
{
    let paths = read_manifest(manifest)?;
    info!(rows = paths.len(), manifest = %manifest.display(), "Manifest loaded");

    let mut report = BatchReport::default();
    for (i, path) in paths.iter().enumerate() {
        let index = i + 1;
        match resolve_image(path, config) {
            Ok(coord) => {
                info!(index, x = coord.x, y = coord.y, z = coord.z, "Physical position resolved");
                report.rows.push(OutputRow {
                    point: index,
                    x: coord.x,
                    y: coord.y,
                    z: coord.z,
                });
            }
            Err(skip) => {
                warn!(index, path = %path.display(), reason = %skip, "Row skipped");
                report.skipped.push((index, skip));
            }
        }
        progress(index, paths.len());
    }

    write_results(output, &report.rows)?;
    info!(
        written = report.rows.len(),
        skipped = report.skipped.len(),
        output = %output.display(),
        "Batch complete"
    );
    Ok(report)
}
