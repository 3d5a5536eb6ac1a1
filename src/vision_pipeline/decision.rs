//! Steering decisions
//!
//! Maps the estimated line column to a discrete command. The forward zone is deliberately
//! off-centre (4/11 to 8/11 of the frame width by default); those fractions are tuned to the
//! robot's camera mounting.

use std::fmt;

use crate::vision_pipeline::common::geometry::Fraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SteeringCommand {
    TurnLeft,
    TurnRight,
    GoForward,
    NoLineFound,
}

impl SteeringCommand {
    /// Short diagnostic token reported for this command.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TurnLeft => "L",
            Self::TurnRight => "R",
            Self::GoForward => "F",
            Self::NoLineFound => "N",
        }
    }
}

impl fmt::Display for SteeringCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Horizontal bounds of the forward zone as fractions of the frame width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadBand {
    /// Columns below `left.of(width)` turn left.
    pub left: Fraction,
    /// Columns at or beyond `right.of(width)` turn right.
    pub right: Fraction,
}

impl Default for DeadBand {
    fn default() -> Self {
        Self {
            left: Fraction::new(4, 11),
            right: Fraction::new(8, 11),
        }
    }
}

impl DeadBand {
    pub fn decide(&self, line_x: Option<usize>, frame_width: usize) -> SteeringCommand {
        let Some(x) = line_x else {
            return SteeringCommand::NoLineFound;
        };
        if x < self.left.of(frame_width) {
            SteeringCommand::TurnLeft
        } else if x >= self.right.of(frame_width) {
            SteeringCommand::TurnRight
        } else {
            SteeringCommand::GoForward
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.left.is_unit_interval() || !self.right.is_unit_interval() {
            return Err(format!("dead-band fractions must lie within [0, 1]: {:?}", self));
        }
        if self.right.less_than(&self.left) {
            return Err(format!("dead-band left bound exceeds right bound: {:?}", self));
        }
        Ok(())
    }
}

/// Decides with the default dead-band.
pub fn decide(line_x: Option<usize>, frame_width: usize) -> SteeringCommand {
    DeadBand::default().decide(line_x, frame_width)
}
