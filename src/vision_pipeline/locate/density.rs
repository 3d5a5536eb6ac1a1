use tracing::trace;

use crate::vision_pipeline::raster::{BinaryRaster, WHITE};

/// Finds the row in `start_row..end_row` with the most white pixels and returns the midpoint
/// of that row's outermost white columns. The first row reaching the maximum wins ties.
pub(crate) fn locate_max_density(
    binary: &BinaryRaster,
    start_row: usize,
    end_row: usize,
) -> Option<usize> {
    let end_row = end_row.min(binary.height());
    let mut best: Option<(usize, usize)> = None;

    for y in start_row..end_row {
        let row = binary.row(y);
        let count = row.iter().filter(|&&v| v == WHITE).count();
        if count == 0 || best.is_some_and(|(best_count, _)| count <= best_count) {
            continue;
        }
        let first = row.iter().position(|&v| v == WHITE).unwrap_or(0);
        let last = row.iter().rposition(|&v| v == WHITE).unwrap_or(first);
        trace!(row = y, count, "New densest row");
        best = Some((count, (first + last) / 2));
    }

    best.map(|(_, x)| x)
}
