//! Line-following vision pipeline
//!
//! Frames flow one way each cycle: capture, binarize, locate the line, decide how to steer.
//! Hardware sits behind the traits in [`capture`] and [`control`] so the pipeline runs the
//! same against a camera, recorded frames, or synthetic input.

pub mod binarize;
pub mod capture;
pub mod common;
pub mod control;
pub mod decision;
pub mod locate;
pub mod raster;

pub use common::{Fraction, RegionOfInterest, Result, VisionError};

pub use raster::{BinaryRaster, Raster};

pub use binarize::{AutoThreshold, ThresholdSearch, auto_threshold, binarize};

pub use locate::{LineLocator, LocatorParams};

pub use decision::{DeadBand, SteeringCommand, decide};

pub use capture::{
    FrameSource, Illumination, SimulatedIllumination, SyntheticFrameSource, TiffFrameSource,
};

pub use control::{
    Actuator, Clock, ControllerConfig, ControllerConfigBuilder, ControllerState, Cycle,
    CycleReport, LineFollowController, LoggingActuator, MonotonicClock,
};
