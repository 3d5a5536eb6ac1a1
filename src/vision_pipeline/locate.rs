//! Line locator module
//!
//! Estimates where the line crosses the bottom of the frame. The main estimator scans each
//! row of the region for a gap-tolerant white run and reports the median of the run centres,
//! so isolated noisy rows cannot drag the estimate. A coarser max-density estimator and the
//! horizontal-line (finish line) detector share the same binary input.

mod crossing;
mod density;
pub mod params;
mod run_scan;

pub use params::LocatorParams;
pub use run_scan::{RowScan, scan_row};

use tracing::instrument;

use crate::vision_pipeline::common::geometry::RegionOfInterest;
use crate::vision_pipeline::raster::BinaryRaster;

#[derive(Debug, Clone, Default)]
pub struct LineLocator {
    params: LocatorParams,
}

impl LineLocator {
    pub fn new(params: LocatorParams) -> Self {
        Self { params }
    }

    /// Median run centre across the valid rows of `region`, or `None` when too few rows
    /// hold a qualifying run.
    #[instrument(level = "debug", skip_all, ret)]
    pub fn locate(&self, binary: &BinaryRaster, region: &RegionOfInterest) -> Option<usize> {
        run_scan::locate_median(binary, region, &self.params)
    }

    pub fn locate_max_density(
        &self,
        binary: &BinaryRaster,
        start_row: usize,
        end_row: usize,
    ) -> Option<usize> {
        density::locate_max_density(binary, start_row, end_row)
    }

    pub fn has_horizontal_line(&self, binary: &BinaryRaster, region: &RegionOfInterest) -> bool {
        crossing::has_horizontal_line(binary, region, self.params.min_line_length)
    }

    pub fn params(&self) -> &LocatorParams {
        &self.params
    }
}
