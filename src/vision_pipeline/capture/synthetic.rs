use tracing::debug;

use crate::vision_pipeline::capture::source::FrameSource;
use crate::vision_pipeline::common::error::{Result, VisionError};
use crate::vision_pipeline::raster::Raster;

const BACKGROUND: u8 = 30;
const LINE: u8 = 220;

/// Renders a bright vertical stripe on a dark floor. The stripe moves `step` columns per
/// frame and bounces off the frame edges, so a controller fed by it sweeps through every
/// steering command.
///
/// Backed by a single frame buffer: acquiring again before releasing fails.
#[derive(Debug)]
pub struct SyntheticFrameSource {
    width: usize,
    height: usize,
    stripe_width: usize,
    position: usize,
    step: isize,
    outstanding: bool,
}

impl SyntheticFrameSource {
    pub fn new(width: usize, height: usize, stripe_width: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(VisionError::InvalidDimensions(width, height));
        }
        if stripe_width == 0 || stripe_width > width {
            return Err(VisionError::InvalidConfig(format!(
                "stripe width {} does not fit a {}-pixel frame",
                stripe_width, width
            )));
        }
        Ok(Self {
            width,
            height,
            stripe_width,
            position: 0,
            step: 1,
            outstanding: false,
        })
    }

    /// Sets the stripe's left column and per-frame movement.
    pub fn with_motion(mut self, position: usize, step: isize) -> Self {
        self.position = position.min(self.width - self.stripe_width);
        self.step = step;
        self
    }

    fn advance(&mut self) {
        let max = (self.width - self.stripe_width) as isize;
        let mut next = self.position as isize + self.step;
        if next < 0 || next > max {
            self.step = -self.step;
            next = next.clamp(0, max);
        }
        self.position = next as usize;
    }
}

impl FrameSource for SyntheticFrameSource {
    fn acquire(&mut self) -> Result<Raster> {
        if self.outstanding {
            return Err(VisionError::CaptureFailed(
                "frame buffer still held by previous cycle".to_string(),
            ));
        }
        let stripe = self.position..self.position + self.stripe_width;
        let frame = Raster::from_fn(self.width, self.height, |x, _| {
            if stripe.contains(&x) { LINE } else { BACKGROUND }
        })?;
        debug!(position = self.position, "Synthetic frame rendered");
        self.advance();
        self.outstanding = true;
        Ok(frame)
    }

    fn release(&mut self, _frame: Raster) {
        self.outstanding = false;
    }
}
