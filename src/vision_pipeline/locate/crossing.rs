use crate::vision_pipeline::common::geometry::RegionOfInterest;
use crate::vision_pipeline::raster::BinaryRaster;

/// True as soon as one row of `region` holds `min_length` strictly consecutive white pixels.
pub(crate) fn has_horizontal_line(
    binary: &BinaryRaster,
    region: &RegionOfInterest,
    min_length: usize,
) -> bool {
    let cols = region.cols(binary.width());
    region.rows(binary.height()).any(|y| {
        let mut run = 0usize;
        cols.clone().any(|x| {
            run = if binary.is_white(x, y) { run + 1 } else { 0 };
            run >= min_length
        })
    })
}
