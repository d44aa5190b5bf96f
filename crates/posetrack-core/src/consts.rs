/// Contour area a region must strictly exceed to count in multi-detection mode.
pub const DEFAULT_MULTI_MIN_AREA: f64 = 10.0;

/// Radius (pixels) of the dot drawn on every accepted detection.
pub const MARKER_DOT_RADIUS: i32 = 5;

/// Offset (pixels) from the centroid to the label marker, along both axes.
pub const MARKER_LABEL_OFFSET: i32 = 5;

/// Pixel height of annotation text.
pub const LABEL_TEXT_SCALE: f32 = 14.0;

/// Rise (pixels) of the offset label baseline above its marker.
pub const OFFSET_LABEL_RISE: i32 = 10;

/// Rise (pixels) of the physical-position label baseline above its marker.
pub const PHYSICAL_LABEL_RISE: i32 = 25;

/// Largest hue value in OpenCV's 8-bit HSV convention (hue degrees / 2).
pub const HUE_MAX: u8 = 179;

/// Number of hue steps in OpenCV's 8-bit HSV convention.
pub const HUE_STEPS: f32 = 180.0;

/// Marker used as the reference point for relative offsets.
pub const DEFAULT_ORIGIN_COLOR: &str = "green";

/// Marker whose physical position is resolved by the batch runner.
pub const DEFAULT_TRACKED_COLOR: &str = "red";

/// Default folder for sampled frames.
pub const DEFAULT_SAMPLE_FOLDER: &str = "screenshots";

/// File name prefix of sampled frames (`captura_001.jpg`, ...).
pub const SAMPLE_FILE_PREFIX: &str = "captura";

/// Extension of sampled frames.
pub const SAMPLE_FILE_EXTENSION: &str = "jpg";

/// Affine row for the physical x axis: `x = a*dx + b*dy + c`.
pub const PHYSICAL_X_COEFFS: [f64; 3] = [0.0, 0.0, 0.0];

/// Affine row for the physical y axis: `y = a*dx + b*dy + c`.
pub const PHYSICAL_Y_COEFFS: [f64; 3] = [-0.3745, -0.01281, -29.15];

/// Affine row for the physical z axis: `z = a*dx + b*dy + c`.
pub const PHYSICAL_Z_COEFFS: [f64; 3] = [0.03843, 0.2577, 60.96];

/// File extensions accepted as frames of an image-sequence source.
pub const IMAGE_SEQUENCE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];
