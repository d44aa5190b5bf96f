pub mod annotate;
pub mod components;
pub mod config;
pub mod contour;
pub mod marker;
pub mod mask;

pub use annotate::{draw_offset_labels, draw_physical_label};
pub use config::{ColorRange, DetectionConfig, DetectionMode, HsvInterval};
pub use marker::{detect_markers, Detection, DetectionResult, MarkerDetection};
