//! CSV tables: the image manifest read by the batch runner and the results
//! table it writes.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PoseTrackError, Result};

#[derive(Debug, Deserialize)]
struct ManifestRecord {
    path: PathBuf,
}

/// One resolved image in the results table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputRow {
    /// 1-based manifest row the coordinate was resolved from.
    pub point: usize,
    /// Constant for a planar rig, written without a fractional part.
    #[serde(serialize_with = "whole_as_integer")]
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub const OUTPUT_HEADER: [&str; 4] = ["point", "x", "y", "z"];

fn whole_as_integer<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Read the `path` column of a manifest, normalizing every entry.
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_file() {
        return Err(PoseTrackError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut paths = Vec::new();
    for record in reader.deserialize::<ManifestRecord>() {
        paths.push(normalize_path(&record?.path));
    }
    Ok(paths)
}

/// Write the results table. The header is written even when `rows` is empty.
pub fn write_results(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component where possible. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_current_dir() {
        assert_eq!(normalize_path(Path::new("./a/./b.jpg")), PathBuf::from("a/b.jpg"));
    }

    #[test]
    fn normalize_folds_parent_dir() {
        assert_eq!(normalize_path(Path::new("a/x/../b.jpg")), PathBuf::from("a/b.jpg"));
        assert_eq!(normalize_path(Path::new("/../b.jpg")), PathBuf::from("/b.jpg"));
    }

    #[test]
    fn normalize_keeps_leading_parent_dirs() {
        assert_eq!(
            normalize_path(Path::new("../../shots/1.jpg")),
            PathBuf::from("../../shots/1.jpg")
        );
    }

    #[test]
    fn whole_x_written_without_fraction() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let rows = [
            OutputRow { point: 1, x: 0.0, y: -36.5, z: 59.25 },
            OutputRow { point: 2, x: 1.5, y: 2.0, z: 3.0 },
        ];

        write_results(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["point,x,y,z", "1,0,-36.5,59.25", "2,1.5,2.0,3.0"]);
    }

    #[test]
    fn normalize_empty_is_current_dir() {
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
    }
}
