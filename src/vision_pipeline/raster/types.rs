//! Raster data types

use crate::vision_pipeline::common::error::{Result, VisionError};

/// Sample value of a black pixel in a binary raster.
pub const BLACK: u8 = 0;
/// Sample value of a white pixel in a binary raster.
pub const WHITE: u8 = 255;

/// Grayscale frame, one byte per pixel, stored row-major.
///
/// The buffer length always equals `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(VisionError::InvalidDimensions(width, height));
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(VisionError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Builds a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Result<Self> {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Thresholded frame whose samples are only ever [`BLACK`] or [`WHITE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BinaryRaster {
    /// Callers guarantee every sample is `BLACK` or `WHITE` and the length matches.
    pub(crate) fn from_samples(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    /// Builds a binary raster where `f(x, y) == true` marks a white pixel.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(VisionError::InvalidDimensions(width, height));
        }
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| if f(x, y) { WHITE } else { BLACK })
            .collect();
        Ok(Self::from_samples(width, height, data))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn is_white(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] == WHITE
    }

    pub fn white_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == WHITE).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Reinterprets the binary samples as a grayscale raster, e.g. for dumping.
    pub fn to_raster(&self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }
}
