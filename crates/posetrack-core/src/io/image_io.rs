use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::error::{PoseTrackError, Result};

/// Load an image file as 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    if !path.is_file() {
        return Err(PoseTrackError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    Ok(image::open(path)?.to_rgb8())
}

/// Save an RGB image as JPEG.
pub fn save_jpeg(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

/// Save an RGB image as PNG.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save an RGB image, choosing the format from the file extension.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => save_jpeg(img, path),
        Some("png") => save_png(img, path),
        _ => {
            img.save(path)?;
            Ok(())
        }
    }
}
