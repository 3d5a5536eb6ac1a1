//! Line locator tuning parameters

/// Tuning for the row-run scanner and the horizontal-line detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorParams {
    /// Non-white pixels tolerated inside a run before it is abandoned.
    pub gap_tolerance: usize,
    /// Columns the run end is pulled back when a run is abandoned.
    pub run_retraction: usize,
    /// White pixels a run needs before its row counts as valid.
    pub min_run_length: usize,
    /// Valid rows must strictly exceed this before a position is reported.
    pub min_valid_rows: usize,
    /// Strictly consecutive white pixels that make a horizontal (finish) line.
    pub min_line_length: usize,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            gap_tolerance: 8,
            run_retraction: 15,
            min_run_length: 20,
            min_valid_rows: 5,
            min_line_length: 10,
        }
    }
}

impl LocatorParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_run_length == 0 {
            return Err("min_run_length must be at least 1".to_string());
        }
        if self.min_line_length == 0 {
            return Err("min_line_length must be at least 1".to_string());
        }
        Ok(())
    }
}
