use tracing::info;

use crate::vision_pipeline::decision::SteeringCommand;

/// Downstream consumer of steering commands (motor driver, serial link, ...).
pub trait Actuator {
    fn apply(&mut self, command: SteeringCommand);
}

/// Reports each command as its diagnostic token and drives nothing.
#[derive(Debug, Default)]
pub struct LoggingActuator;

impl Actuator for LoggingActuator {
    fn apply(&mut self, command: SteeringCommand) {
        info!(code = command.code(), "Steering command");
    }
}
