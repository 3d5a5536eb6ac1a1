//! Binarization of grayscale frames
//!
//! A sample becomes white when it is strictly brighter than the threshold. The threshold is
//! either configured or found by [`auto_threshold`], which walks upward from zero until the
//! number of white pixels falls inside a target band.

use tracing::{debug, warn};

use crate::vision_pipeline::raster::{BLACK, BinaryRaster, Raster, WHITE};

/// Thresholds `raster`: `WHITE` where `sample > threshold`, `BLACK` elsewhere.
pub fn binarize(raster: &Raster, threshold: u8) -> BinaryRaster {
    let data = raster
        .as_slice()
        .iter()
        .map(|&v| if v > threshold { WHITE } else { BLACK })
        .collect();
    BinaryRaster::from_samples(raster.width(), raster.height(), data)
}

/// How the threshold search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdSearch {
    /// The white-pixel count lies inside the requested band.
    Converged,
    /// No threshold in `0..=255` reaches the band; the closest boundary threshold was used.
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct AutoThreshold {
    pub binary: BinaryRaster,
    pub threshold: u8,
    pub white_count: usize,
    pub search: ThresholdSearch,
}

/// Searches for a threshold whose white-pixel count lies in `min_white..=max_white`.
///
/// White count never increases as the threshold rises, so the search only ever steps up
/// from zero. When the count jumps from above the band to below it between two adjacent
/// thresholds (or is already below it at zero) the band cannot be met; the search then stops
/// on whichever boundary threshold lands closer to the band, preferring the lower one.
pub fn auto_threshold(raster: &Raster, min_white: usize, max_white: usize) -> AutoThreshold {
    let mut histogram = [0usize; 256];
    for &v in raster.as_slice() {
        histogram[v as usize] += 1;
    }
    // brighter_than[t] = number of samples strictly greater than t
    let mut brighter_than = [0usize; 256];
    let mut running = 0usize;
    for t in (0..256).rev() {
        brighter_than[t] = running;
        running += histogram[t];
    }

    let mut threshold: u8 = 0;
    let mut above_band: Option<u8> = None;
    let search = loop {
        let count = brighter_than[threshold as usize];
        if count > max_white {
            if threshold == u8::MAX {
                break ThresholdSearch::Unreachable;
            }
            above_band = Some(threshold);
            threshold += 1;
            continue;
        }
        if count < min_white {
            if let Some(previous) = above_band {
                let overshoot = brighter_than[previous as usize] - max_white;
                let undershoot = min_white - count;
                if overshoot <= undershoot {
                    threshold = previous;
                }
            }
            break ThresholdSearch::Unreachable;
        }
        break ThresholdSearch::Converged;
    };

    let white_count = brighter_than[threshold as usize];
    match search {
        ThresholdSearch::Converged => debug!(
            threshold,
            white_count, "Auto threshold converged"
        ),
        ThresholdSearch::Unreachable => warn!(
            threshold,
            white_count,
            min_white,
            max_white,
            "White-pixel band unreachable, using best-effort threshold"
        ),
    }

    AutoThreshold {
        binary: binarize(raster, threshold),
        threshold,
        white_count,
        search,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Raster {
        Raster::from_fn(width, height, |x, _| x as u8).unwrap()
    }

    #[test]
    fn test_output_is_strictly_binary() {
        let raster = Raster::from_fn(64, 8, |x, y| (x * 7 + y * 31) as u8).unwrap();
        for threshold in [0u8, 1, 100, 254, 255] {
            let binary = binarize(&raster, threshold);
            assert!(binary.as_slice().iter().all(|&v| v == BLACK || v == WHITE));
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let raster = Raster::new(3, 1, vec![99, 100, 101]).unwrap();
        let binary = binarize(&raster, 100);
        assert_eq!(binary.row(0), &[BLACK, BLACK, WHITE]);
    }

    #[test]
    fn test_binarize_is_idempotent() {
        let raster = Raster::from_fn(32, 4, |x, y| (x * 9 + y) as u8).unwrap();
        for threshold in [0u8, 60, 128, 255] {
            let once = binarize(&raster, threshold);
            let twice = binarize(&once.to_raster(), threshold);
            assert_eq!(once, twice, "threshold {}", threshold);
        }
    }

    #[test]
    fn test_auto_threshold_lands_in_band() {
        // 256 columns, one per intensity: white count at threshold t is 255 - t per row
        let raster = gradient(256, 2);
        let result = auto_threshold(&raster, 100, 120);
        assert_eq!(result.search, ThresholdSearch::Converged);
        assert!((100..=120).contains(&result.white_count));
        assert_eq!(result.white_count, result.binary.white_count());
        assert_eq!(result.threshold, 195);
    }

    #[test]
    fn test_auto_threshold_keeps_zero_when_already_in_band() {
        let raster = gradient(256, 1);
        let result = auto_threshold(&raster, 0, usize::MAX);
        assert_eq!(result.threshold, 0);
        assert_eq!(result.search, ThresholdSearch::Converged);
    }

    #[test]
    fn test_auto_threshold_dark_frame_stops_at_zero() {
        let raster = Raster::new(8, 8, vec![0u8; 64]).unwrap();
        let result = auto_threshold(&raster, 10, 20);
        assert_eq!(result.search, ThresholdSearch::Unreachable);
        assert_eq!(result.threshold, 0);
        assert_eq!(result.white_count, 0);
    }

    #[test]
    fn test_auto_threshold_skipped_band_terminates() {
        // Half the pixels at 50, half at 200: counts jump 64 -> 32 -> 0
        let raster = Raster::from_fn(8, 8, |x, _| if x < 4 { 50 } else { 200 }).unwrap();
        let result = auto_threshold(&raster, 10, 20);
        assert_eq!(result.search, ThresholdSearch::Unreachable);
        // 32 whites overshoots by 12, 0 whites undershoots by 10
        assert_eq!(result.threshold, 200);
        assert_eq!(result.white_count, 0);
    }

    #[test]
    fn test_auto_threshold_prefers_lower_threshold_on_tie() {
        let raster = Raster::from_fn(8, 8, |x, _| if x < 4 { 50 } else { 200 }).unwrap();
        // 32 overshoots 22 by 10, 0 undershoots 10 by 10
        let result = auto_threshold(&raster, 10, 22);
        assert_eq!(result.search, ThresholdSearch::Unreachable);
        assert_eq!(result.white_count, 32);
        assert_eq!(result.threshold, 199);
    }

    #[test]
    fn test_auto_threshold_inverted_band_terminates() {
        let raster = gradient(256, 1);
        let result = auto_threshold(&raster, 50, 10);
        assert_eq!(result.search, ThresholdSearch::Unreachable);
    }
}
