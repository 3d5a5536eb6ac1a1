//! Control loop module
//!
//! Polls the frame source on a fixed cadence and drives each frame through binarization,
//! line location and the steering decision, forwarding the command to an actuator. All
//! cross-cycle state lives in the controller value; nothing is global.

mod actuator;
mod config;
mod controller;
mod state;
mod timer;
mod timing;

#[cfg(test)]
mod tests;

pub use actuator::{Actuator, LoggingActuator};
pub use config::{ControllerConfig, ControllerConfigBuilder, WhitePixelBand};
pub use controller::{Cycle, CycleReport, LineFollowController};
pub use state::{ControlEvent, ControllerState};
pub use timer::{Clock, FrameTimer, MonotonicClock};
pub use timing::{PipelineTimings, StageTimer, StageTiming};
