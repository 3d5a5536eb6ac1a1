//! Capture module
//!
//! Capability interfaces for the camera and the illumination LED, plus the sources used
//! when no camera is attached: a synthetic stripe generator and a TIFF frame replayer.

mod illumination;
mod source;
mod synthetic;
mod tiff_source;

pub use illumination::{Illumination, SimulatedIllumination};
pub use source::FrameSource;
pub use synthetic::SyntheticFrameSource;
pub use tiff_source::TiffFrameSource;
