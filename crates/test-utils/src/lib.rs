//! Shared test utilities for the grid I/O workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic grid generators
//! - Padding helpers for logical buffers
//! - Grid fixtures with known extents and values
//! - Approximate and NaN-aware equality assertions
//!
//! It deliberately does not depend on `grid-io`, so the generators deal in
//! plain row-major `Vec<f32>` buffers.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting two grids are equal within `epsilon`, where NaN only
/// matches NaN.
///
/// # Usage
///
/// ```
/// use test_utils::assert_grid_approx_eq;
///
/// assert_grid_approx_eq!(&[1.0_f32, f32::NAN], &[1.0004_f32, f32::NAN], 0.001);
/// ```
#[macro_export]
macro_rules! assert_grid_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &[f32] = $left;
        let right: &[f32] = $right;
        assert_eq!(left.len(), right.len(), "grid lengths differ");
        for (index, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            if let Some(message) = $crate::cell_mismatch(*l, *r, $epsilon as f64) {
                panic!("assertion failed: grids differ at cell {}: {}", index, message);
            }
        }
    }};
}

/// Describe why two cells differ, or `None` if they match.
pub fn cell_mismatch(left: f32, right: f32, epsilon: f64) -> Option<String> {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => None,
        (true, false) | (false, true) => Some(format!("{} vs {}", left, right)),
        (false, false) => {
            let diff = (left as f64 - right as f64).abs();
            (diff > epsilon).then(|| format!("{} vs {} (diff {} > {})", left, right, diff, epsilon))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 1.0, 0.001);
    }

    #[test]
    fn test_grid_approx_eq_matches_nan() {
        assert_grid_approx_eq!(&[f32::NAN, 2.0], &[f32::NAN, 2.0], 0.0);
    }

    #[test]
    #[should_panic(expected = "cell 1")]
    fn test_grid_approx_eq_nan_vs_value() {
        assert_grid_approx_eq!(&[0.0, f32::NAN], &[0.0, 0.0], 1.0);
    }
}
