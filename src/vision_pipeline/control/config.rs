//! Controller configuration types

use crate::vision_pipeline::common::error::{Result, VisionError};
use crate::vision_pipeline::common::geometry::RegionOfInterest;
use crate::vision_pipeline::decision::DeadBand;
use crate::vision_pipeline::locate::LocatorParams;

/// Target range for the number of white pixels an auto-calibrated threshold should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitePixelBand {
    pub min: usize,
    pub max: usize,
}

/// Everything the control loop needs, fixed for the lifetime of a controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Expected frame width in pixels
    pub frame_width: usize,
    /// Expected frame height in pixels
    pub frame_height: usize,
    /// Fixed binarization threshold, replaced by the result of each calibration
    pub threshold: u8,
    /// White-pixel band used when calibrating the threshold
    pub white_band: WhitePixelBand,
    /// Whether the first cycle calibrates the threshold
    pub calibrate_on_start: bool,
    /// Region scanned for the line position
    pub scan_region: RegionOfInterest,
    /// Region scanned for finish/start lines
    pub finish_region: RegionOfInterest,
    /// Row scanner tuning
    pub locator: LocatorParams,
    /// Whether horizontal lines drive the finish-line states
    pub detect_finish_line: bool,
    /// Forward zone of the steering decision
    pub dead_band: DeadBand,
    /// Minimum time between two capture attempts
    pub poll_interval_ms: u64,
    /// LED level applied when the controller starts
    pub brightness: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            frame_width: 160,
            frame_height: 120,
            threshold: 128,
            white_band: WhitePixelBand { min: 960, max: 2880 },
            calibrate_on_start: false,
            scan_region: RegionOfInterest::bottom_quarter(),
            finish_region: RegionOfInterest::bottom_quarter(),
            locator: LocatorParams::default(),
            detect_finish_line: false,
            dead_band: DeadBand::default(),
            poll_interval_ms: 1000,
            brightness: 64,
        }
    }
}

impl ControllerConfig {
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(VisionError::InvalidDimensions(
                self.frame_width,
                self.frame_height,
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(VisionError::InvalidConfig(
                "poll interval must be positive".to_string(),
            ));
        }
        if self.white_band.min > self.white_band.max {
            return Err(VisionError::InvalidConfig(format!(
                "white band minimum {} exceeds maximum {}",
                self.white_band.min, self.white_band.max
            )));
        }
        self.scan_region
            .validate()
            .and_then(|_| self.finish_region.validate())
            .and_then(|_| self.locator.validate())
            .and_then(|_| self.dead_band.validate())
            .map_err(VisionError::InvalidConfig)
    }
}

/// Builder for ControllerConfig
#[derive(Default)]
pub struct ControllerConfigBuilder {
    frame_size: Option<(usize, usize)>,
    threshold: Option<u8>,
    white_band: Option<WhitePixelBand>,
    calibrate_on_start: Option<bool>,
    scan_region: Option<RegionOfInterest>,
    finish_region: Option<RegionOfInterest>,
    locator: Option<LocatorParams>,
    detect_finish_line: Option<bool>,
    dead_band: Option<DeadBand>,
    poll_interval_ms: Option<u64>,
    brightness: Option<u8>,
}

impl ControllerConfigBuilder {
    pub fn frame_size(mut self, width: usize, height: usize) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn white_band(mut self, min: usize, max: usize) -> Self {
        self.white_band = Some(WhitePixelBand { min, max });
        self
    }

    pub fn calibrate_on_start(mut self, enable: bool) -> Self {
        self.calibrate_on_start = Some(enable);
        self
    }

    pub fn scan_region(mut self, region: RegionOfInterest) -> Self {
        self.scan_region = Some(region);
        self
    }

    pub fn finish_region(mut self, region: RegionOfInterest) -> Self {
        self.finish_region = Some(region);
        self
    }

    pub fn locator(mut self, params: LocatorParams) -> Self {
        self.locator = Some(params);
        self
    }

    pub fn detect_finish_line(mut self, enable: bool) -> Self {
        self.detect_finish_line = Some(enable);
        self
    }

    pub fn dead_band(mut self, dead_band: DeadBand) -> Self {
        self.dead_band = Some(dead_band);
        self
    }

    pub fn poll_interval_ms(mut self, interval: u64) -> Self {
        self.poll_interval_ms = Some(interval);
        self
    }

    pub fn brightness(mut self, level: u8) -> Self {
        self.brightness = Some(level);
        self
    }

    pub fn build(self) -> ControllerConfig {
        let default = ControllerConfig::default();
        let (frame_width, frame_height) = self
            .frame_size
            .unwrap_or((default.frame_width, default.frame_height));
        ControllerConfig {
            frame_width,
            frame_height,
            threshold: self.threshold.unwrap_or(default.threshold),
            white_band: self.white_band.unwrap_or(default.white_band),
            calibrate_on_start: self.calibrate_on_start.unwrap_or(default.calibrate_on_start),
            scan_region: self.scan_region.unwrap_or(default.scan_region),
            finish_region: self.finish_region.unwrap_or(default.finish_region),
            locator: self.locator.unwrap_or(default.locator),
            detect_finish_line: self.detect_finish_line.unwrap_or(default.detect_finish_line),
            dead_band: self.dead_band.unwrap_or(default.dead_band),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(default.poll_interval_ms),
            brightness: self.brightness.unwrap_or(default.brightness),
        }
    }
}
