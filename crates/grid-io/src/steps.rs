//! Step-uniformity diagnostic for coordinate axes.

use crate::error::GridWarning;

/// Relative spread of steps tolerated before an axis counts as irregular.
const STEP_TOLERANCE: f64 = 0.05;

/// Check that `coords` has a near-constant step.
///
/// Returns an [`GridWarning::IrregularStep`] carrying the mean step that will
/// be used and the observed extremes when the spread between the smallest and
/// largest step exceeds five percent of their combined magnitude.
pub fn check_step(coords: &[f64], axis: &str, file: &str) -> Option<GridWarning> {
    if coords.len() < 2 {
        return None;
    }

    let (min, max) = coords
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), step| {
            (lo.min(step), hi.max(step))
        });

    let magnitude = min.abs() + max.abs();
    if magnitude == 0.0 || (min - max).abs() / magnitude <= STEP_TOLERANCE {
        return None;
    }

    let used = (coords[coords.len() - 1] - coords[0]) / (coords.len() - 1) as f64;
    Some(GridWarning::IrregularStep {
        name: file.to_string(),
        axis: axis.to_string(),
        used,
        min,
        max,
    })
}
