//! Missing-value handling and running value range shared by both pipelines.

use crate::format::Representation;
use crate::header::GridHeader;

/// Detects and produces the no-data value of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingValuePolicy {
    sentinel: Option<f64>,
}

impl MissingValuePolicy {
    /// Policy for reading: sentinel comparison only when `nan_value` is a
    /// number. A NaN sentinel needs no substitution pass.
    pub fn from_header(header: &GridHeader) -> Self {
        let sentinel = Some(header.nan_value).filter(|v| !v.is_nan());
        Self { sentinel }
    }

    /// Policy for writing to `representation`.
    ///
    /// Integer types cannot hold NaN, so an unset sentinel falls back to the
    /// type's minimum.
    pub fn for_encoding(header: &GridHeader, representation: Representation) -> Self {
        if header.nan_value.is_nan() && representation.is_integral() {
            return Self {
                sentinel: Some(representation.default_nan_value()),
            };
        }
        Self::from_header(header)
    }

    /// True when cells are compared against a numeric sentinel.
    pub fn is_active(&self) -> bool {
        self.sentinel.is_some()
    }

    pub fn sentinel(&self) -> Option<f64> {
        self.sentinel
    }

    /// Stored value written for a missing cell.
    pub fn fill_value(&self) -> f64 {
        self.sentinel.unwrap_or(f64::NAN)
    }

    /// True if a stored value denotes a missing cell.
    #[inline]
    pub fn is_missing(&self, raw: f64) -> bool {
        raw.is_nan() || self.sentinel == Some(raw)
    }
}

/// Running extrema over valid cells, kept in stored units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeAccumulator {
    min: f64,
    max: f64,
    count: usize,
}

impl Default for RangeAccumulator {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }
}

impl RangeAccumulator {
    #[inline]
    pub fn update(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.count += 1;
    }

    /// Number of cells seen.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Extrema in stored units, `None` if no cell was seen.
    pub fn stored(&self) -> Option<(f64, f64)> {
        (!self.is_empty()).then_some((self.min, self.max))
    }

    /// Extrema in real-world units, `code * scale + offset`.
    ///
    /// A negative scale factor flips the order so the result stays ascending.
    pub fn to_real(&self, scale: f64, offset: f64) -> Option<(f64, f64)> {
        self.stored().map(|(min, max)| {
            let a = min * scale + offset;
            let b = max * scale + offset;
            (a.min(b), a.max(b))
        })
    }
}
