//! Common utilities module
//!
//! Error types and the fraction-based geometry shared by every pipeline stage.

pub mod error;
pub mod geometry;

pub use error::{Result, VisionError};
pub use geometry::{Fraction, RegionOfInterest};
