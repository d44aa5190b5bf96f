pub mod batch;
pub mod calibration;
pub mod color;
pub mod consts;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod io;
pub mod physical;
pub mod relative;
pub mod sampling;
