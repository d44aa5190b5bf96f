pub mod image_io;
pub mod image_seq;
pub mod ser;
pub mod source;
pub mod table;
#[cfg(feature = "gstreamer")]
pub mod video;

pub use source::{open_source, FrameSource};
