#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic target-point generation for Curve Fit levels.
//!
//! Candidates are drawn by rejection sampling: an `x` value already present in
//! the set is discarded and redrawn, so every generated set has pairwise
//! distinct `x` values. The random source is injected through
//! [`CoordinateSource`] so replays and tests can control every draw.

use curve_fit_core::{Point, PointCount, TargetSet, COORDINATE_MAX, COORDINATE_MIN, COORDINATE_SPAN};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Source of uniformly distributed target coordinates.
pub trait CoordinateSource {
    /// Draws a coordinate from `[COORDINATE_MIN, COORDINATE_MAX]`.
    fn next_coordinate(&mut self) -> i32;
}

impl<S> CoordinateSource for &mut S
where
    S: CoordinateSource + ?Sized,
{
    fn next_coordinate(&mut self) -> i32 {
        (**self).next_coordinate()
    }
}

/// Coordinate source backed by a random number generator.
#[derive(Clone, Debug)]
pub struct RngSource<R = ChaCha8Rng> {
    rng: R,
}

impl RngSource<ChaCha8Rng> {
    /// Creates a reproducible source seeded with the provided value.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSource<R> {
    /// Wraps an existing random number generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CoordinateSource for RngSource<R> {
    fn next_coordinate(&mut self) -> i32 {
        self.rng.gen_range(COORDINATE_MIN..=COORDINATE_MAX)
    }
}

/// Generates `count` target points with distinct `x` values.
///
/// Each accepted `x` is followed by an independent `y` draw. `x` draws outside
/// the coordinate range are rejected like duplicates; `y` draws are clamped.
pub fn generate<S>(count: PointCount, source: &mut S) -> TargetSet
where
    S: CoordinateSource + ?Sized,
{
    let mut used = [false; COORDINATE_SPAN];
    let mut points = Vec::with_capacity(count.get());

    while points.len() < count.get() {
        let x = source.next_coordinate();
        let Some(slot) = slot_for(x) else {
            continue;
        };
        if used[slot] {
            continue;
        }
        used[slot] = true;

        let y = source
            .next_coordinate()
            .clamp(COORDINATE_MIN, COORDINATE_MAX);
        points.push(Point::new(x, y));
    }

    TargetSet::new_unchecked(points)
}

fn slot_for(coordinate: i32) -> Option<usize> {
    if !(COORDINATE_MIN..=COORDINATE_MAX).contains(&coordinate) {
        return None;
    }
    usize::try_from(coordinate - COORDINATE_MIN).ok()
}
