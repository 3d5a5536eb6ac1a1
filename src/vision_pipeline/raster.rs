//! Raster module
//!
//! Grayscale frames as delivered by a frame source, their binarized counterparts, and the
//! diagnostic dumps used for offline calibration.

pub mod types;
mod dump;

pub use types::{BLACK, BinaryRaster, Raster, WHITE};
pub use dump::{read_tiff, write_pixel_dump, write_tiff};
