#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tolerance-based solution checking for Curve Fit levels.

use curve_fit_core::{evaluate, Coefficients, Mode, TargetSet};
use glam::DVec2;

/// Reports whether the curve passes within `tolerance` of every target.
///
/// A target matches when `|evaluate(x) - y| < tolerance`; the comparison is
/// strict, so a residual exactly equal to the tolerance fails.
#[must_use]
pub fn check(coefficients: Coefficients, mode: Mode, targets: &TargetSet, tolerance: f64) -> bool {
    check_points(
        coefficients,
        mode,
        targets.iter().map(|point| point.to_model()),
        tolerance,
    )
}

/// Same as [`check`] for arbitrary real-valued model-space points.
///
/// Vacuously true when `points` is empty.
#[must_use]
pub fn check_points<I>(coefficients: Coefficients, mode: Mode, points: I, tolerance: f64) -> bool
where
    I: IntoIterator<Item = DVec2>,
{
    points
        .into_iter()
        .all(|point| residual(coefficients, mode, point).abs() < tolerance)
}

/// Signed vertical distance between the curve and `point`.
#[must_use]
pub fn residual(coefficients: Coefficients, mode: Mode, point: DVec2) -> f64 {
    evaluate(point.x, coefficients, mode) - point.y
}
