use tracing::debug;

use crate::vision_pipeline::common::error::Result;

/// Brightness control for the on-board LED.
pub trait Illumination {
    fn set_brightness(&mut self, level: u8) -> Result<()>;
}

/// Illumination stand-in that only remembers and logs the requested level.
#[derive(Debug, Default)]
pub struct SimulatedIllumination {
    level: Option<u8>,
}

impl SimulatedIllumination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }
}

impl Illumination for SimulatedIllumination {
    fn set_brightness(&mut self, level: u8) -> Result<()> {
        debug!(level, "Illumination level set");
        self.level = Some(level);
        Ok(())
    }
}
