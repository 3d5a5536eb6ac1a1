//! Mission state machine

use std::fmt;

/// Where the robot is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    FollowLine,
    AvoidObstacle,
    /// Driving over the finish line. `line_cleared` latches once the line has left the
    /// finish region, so the same line is not mistaken for the start line.
    CrossFinishLine { line_cleared: bool },
    Finish,
}

/// Signals that move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    ObstacleDetected,
    ObstacleCleared,
    FinishLineDetected,
    FinishLineLeft,
    StartLineDetected,
}

impl ControllerState {
    /// Applies `event`; pairs without a defined transition leave the state unchanged.
    pub fn transition(self, event: ControlEvent) -> Self {
        use ControlEvent::*;
        use ControllerState::*;

        match (self, event) {
            (FollowLine, ObstacleDetected) => AvoidObstacle,
            (AvoidObstacle, ObstacleCleared) => FollowLine,
            (FollowLine, FinishLineDetected) => CrossFinishLine { line_cleared: false },
            (CrossFinishLine { line_cleared: false }, FinishLineLeft) => {
                CrossFinishLine { line_cleared: true }
            }
            (CrossFinishLine { line_cleared: true }, StartLineDetected) => Finish,
            (state, _) => state,
        }
    }

    /// Translates whether a horizontal line is visible into the event this state reacts to.
    pub fn horizontal_line_event(&self, seen: bool) -> Option<ControlEvent> {
        match (self, seen) {
            (Self::FollowLine, true) => Some(ControlEvent::FinishLineDetected),
            (Self::CrossFinishLine { line_cleared: false }, false) => {
                Some(ControlEvent::FinishLineLeft)
            }
            (Self::CrossFinishLine { line_cleared: true }, true) => {
                Some(ControlEvent::StartLineDetected)
            }
            _ => None,
        }
    }

    /// States in which frames are captured and steering commands are produced.
    pub fn follows_line(&self) -> bool {
        matches!(self, Self::FollowLine | Self::CrossFinishLine { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FollowLine => "follow_line",
            Self::AvoidObstacle => "avoid_obstacle",
            Self::CrossFinishLine { .. } => "cross_finish_line",
            Self::Finish => "finish",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_round_trip() {
        let state = ControllerState::FollowLine.transition(ControlEvent::ObstacleDetected);
        assert_eq!(state, ControllerState::AvoidObstacle);
        assert!(!state.follows_line());
        assert_eq!(
            state.transition(ControlEvent::ObstacleCleared),
            ControllerState::FollowLine
        );
    }

    #[test]
    fn test_finish_sequence() {
        let mut state = ControllerState::default();
        for seen in [false, true, true, false, false, true] {
            if let Some(event) = state.horizontal_line_event(seen) {
                state = state.transition(event);
            }
        }
        assert_eq!(state, ControllerState::Finish);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_line_must_clear_before_start_line() {
        let mut state = ControllerState::FollowLine.transition(ControlEvent::FinishLineDetected);
        for _ in 0..5 {
            if let Some(event) = state.horizontal_line_event(true) {
                state = state.transition(event);
            }
        }
        assert_eq!(state, ControllerState::CrossFinishLine { line_cleared: false });
    }

    #[test]
    fn test_undefined_pairs_are_ignored() {
        assert_eq!(
            ControllerState::Finish.transition(ControlEvent::ObstacleCleared),
            ControllerState::Finish
        );
        assert_eq!(
            ControllerState::AvoidObstacle.transition(ControlEvent::FinishLineDetected),
            ControllerState::AvoidObstacle
        );
        assert_eq!(
            ControllerState::FollowLine.transition(ControlEvent::StartLineDetected),
            ControllerState::FollowLine
        );
    }
}
