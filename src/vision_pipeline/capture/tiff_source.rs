//! Replays recorded 8-bit grayscale TIFF frames as if they came from the camera.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::vision_pipeline::capture::source::FrameSource;
use crate::vision_pipeline::common::error::{Result, VisionError};
use crate::vision_pipeline::raster::{Raster, read_tiff};

/// Cycles through a fixed list of TIFF files, wrapping around after the last one.
#[derive(Debug)]
pub struct TiffFrameSource {
    frames: Vec<PathBuf>,
    next: usize,
    outstanding: bool,
}

impl TiffFrameSource {
    pub fn new(frames: Vec<PathBuf>) -> Result<Self> {
        if frames.is_empty() {
            return Err(VisionError::InvalidConfig(
                "no frames to replay".to_string(),
            ));
        }
        Ok(Self {
            frames,
            next: 0,
            outstanding: false,
        })
    }

    /// Collects every `.tif`/`.tiff` file in `dir`, in file-name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff")
                    })
            })
            .collect();
        frames.sort();
        info!(dir = %dir.display(), count = frames.len(), "Replaying TIFF frames");
        Self::new(frames)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for TiffFrameSource {
    fn acquire(&mut self) -> Result<Raster> {
        if self.outstanding {
            return Err(VisionError::CaptureFailed(
                "frame buffer still held by previous cycle".to_string(),
            ));
        }
        let path = &self.frames[self.next];
        self.next = (self.next + 1) % self.frames.len();

        let file = File::open(path)
            .map_err(|e| VisionError::CaptureFailed(format!("{}: {}", path.display(), e)))?;
        let frame = read_tiff(BufReader::new(file))
            .map_err(|e| VisionError::CaptureFailed(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Replayed frame");
        self.outstanding = true;
        Ok(frame)
    }

    fn release(&mut self, _frame: Raster) {
        self.outstanding = false;
    }
}
