//! Resolution-independent geometry
//!
//! Scan regions and decision bounds are stored as fractions of the frame size so the same
//! configuration works for any sensor resolution. Fractions are applied with integer
//! arithmetic (`len * num / den`), which keeps bounds exact and reproducible. Products are
//! widened to `u128` so large numerators and denominators cannot overflow.

use std::ops::Range;

/// A non-negative rational number `num / den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub num: usize,
    pub den: usize,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction::new(0, 1);
    pub const ONE: Fraction = Fraction::new(1, 1);

    pub const fn new(num: usize, den: usize) -> Self {
        Self { num, den }
    }

    /// Scales `len` by this fraction, truncating and clamping to `len`.
    pub fn of(&self, len: usize) -> usize {
        if self.den == 0 {
            return 0;
        }
        let scaled = len as u128 * self.num as u128 / self.den as u128;
        scaled.min(len as u128) as usize
    }

    /// A fraction is usable when its denominator is non-zero and it does not exceed one.
    pub fn is_unit_interval(&self) -> bool {
        self.den != 0 && self.num <= self.den
    }

    pub(crate) fn less_than(&self, other: &Fraction) -> bool {
        (self.num as u128) * (other.den as u128) < (other.num as u128) * (self.den as u128)
    }
}

/// Rectangular scan window expressed as fractions of the frame height (rows) and width
/// (columns). Upper bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOfInterest {
    pub top: Fraction,
    pub bottom: Fraction,
    pub left: Fraction,
    pub right: Fraction,
}

impl RegionOfInterest {
    pub const fn full() -> Self {
        Self {
            top: Fraction::ZERO,
            bottom: Fraction::ONE,
            left: Fraction::ZERO,
            right: Fraction::ONE,
        }
    }

    /// The bottom quarter of the frame, across its full width.
    pub const fn bottom_quarter() -> Self {
        Self {
            top: Fraction::new(3, 4),
            ..Self::full()
        }
    }

    pub fn rows(&self, height: usize) -> Range<usize> {
        self.top.of(height)..self.bottom.of(height)
    }

    pub fn cols(&self, width: usize) -> Range<usize> {
        self.left.of(width)..self.right.of(width)
    }

    pub fn validate(&self) -> Result<(), String> {
        let bounds = [self.top, self.bottom, self.left, self.right];
        if !bounds.iter().all(Fraction::is_unit_interval) {
            return Err(format!("region bounds must lie within [0, 1]: {:?}", self));
        }
        if !self.top.less_than(&self.bottom) || !self.left.less_than(&self.right) {
            return Err(format!("region is empty: {:?}", self));
        }
        Ok(())
    }
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self::bottom_quarter()
    }
}
