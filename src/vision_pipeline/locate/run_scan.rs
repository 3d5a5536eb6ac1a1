use std::ops::Range;

use tracing::trace;

use crate::vision_pipeline::common::geometry::RegionOfInterest;
use crate::vision_pipeline::locate::params::LocatorParams;
use crate::vision_pipeline::raster::{BinaryRaster, WHITE};

/// Outcome of scanning a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowScan {
    /// Centre of the first run that reached the minimum length, if any.
    pub center: Option<usize>,
    /// Start column of the run being tracked when the scan stopped.
    pub run_start: Option<usize>,
    /// Last white column of that run, or the retracted end of an abandoned one.
    pub run_end: usize,
}

/// Tracks one gap-tolerant white run across `cols` of `row`.
///
/// The centre is recorded as soon as the run reaches `min_run_length` white pixels and is
/// refreshed while the same run keeps growing. A valid run ends the row scan once a gap
/// exceeds the tolerance; an invalid one is dropped and scanning continues.
pub fn scan_row(row: &[u8], cols: Range<usize>, params: &LocatorParams) -> RowScan {
    let first = cols.start;
    let cols = first..cols.end.min(row.len());

    let mut run_start: Option<usize> = None;
    let mut run_end = first;
    let mut run_white = 0usize;
    let mut gap = 0usize;
    let mut center = None;

    for x in cols {
        if row[x] == WHITE {
            let start = *run_start.get_or_insert(x);
            run_end = x;
            run_white += 1;
            gap = 0;
            if run_white >= params.min_run_length {
                center = Some((start + run_end) / 2);
            }
            continue;
        }

        gap += 1;
        if gap > params.gap_tolerance && run_start.is_some() {
            if center.is_some() {
                break;
            }
            run_start = None;
            run_white = 0;
            run_end = run_end.saturating_sub(params.run_retraction).max(first);
        }
    }

    RowScan {
        center,
        run_start,
        run_end,
    }
}

pub(crate) fn locate_median(
    binary: &BinaryRaster,
    region: &RegionOfInterest,
    params: &LocatorParams,
) -> Option<usize> {
    let cols = region.cols(binary.width());
    let mut centers: Vec<usize> = region
        .rows(binary.height())
        .filter_map(|y| {
            let scan = scan_row(binary.row(y), cols.clone(), params);
            trace!(row = y, center = ?scan.center, "Row scanned");
            scan.center
        })
        .collect();

    if centers.len() <= params.min_valid_rows {
        trace!(valid_rows = centers.len(), "Not enough valid rows");
        return None;
    }

    centers.sort_unstable();
    Some(centers[centers.len() / 2])
}
