use crate::vision_pipeline::common::error::Result;
use crate::vision_pipeline::raster::Raster;

/// A camera handing out one grayscale frame at a time.
///
/// The frame returned by `acquire` belongs to the caller until it is passed back through
/// `release`. Sources backed by a single buffer fail `acquire` with `CaptureFailed` while a
/// frame is still out.
pub trait FrameSource {
    fn acquire(&mut self) -> Result<Raster>;
    fn release(&mut self, frame: Raster);
}
