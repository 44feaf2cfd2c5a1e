#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure curve sampling system that turns the polynomial model into a drawable path.
//!
//! Samples are taken at `x = min + i·step` so the sample count depends only on
//! the domain and never on accumulated floating point error. The resulting
//! [`CurvePath`] is expressed in drawing space: each sample passes through the
//! same [`CanvasTransform`] that adapters use for target markers.

use curve_fit_core::{evaluate, CanvasTransform, Coefficients, Event, Mode};
use glam::DVec2;
use thiserror::Error;

const STEP_EPSILON: f64 = 1e-9;

/// Closed model-space interval sampled at a fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingDomain {
    min: f64,
    max: f64,
    step: f64,
}

impl SamplingDomain {
    /// Lower bound of the default domain.
    pub const DEFAULT_MIN: f64 = -8.0;
    /// Upper bound of the default domain.
    pub const DEFAULT_MAX: f64 = 8.0;
    /// Distance between samples of the default domain.
    pub const DEFAULT_STEP: f64 = 0.05;
    /// Largest number of samples a domain may produce.
    pub const MAX_SAMPLES: usize = 1_000_000;

    /// Creates a validated sampling domain.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, SamplingError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SamplingError::NonFiniteBounds { min, max });
        }
        if max < min {
            return Err(SamplingError::InvertedBounds { min, max });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(SamplingError::InvalidStep { step });
        }
        // A span overflowing to infinity lands here as well.
        let steps = (max - min) / step + STEP_EPSILON;
        if steps >= Self::MAX_SAMPLES as f64 {
            return Err(SamplingError::TooManySamples { min, max, step });
        }
        Ok(Self { min, max, step })
    }

    /// Lower bound of the domain.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the domain.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Distance between neighbouring samples.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Number of samples taken, both bounds included when the step divides the span.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        let steps = ((self.max - self.min) / self.step + STEP_EPSILON).floor();
        steps as usize + 1
    }

    /// Model-space x coordinate of the sample at `index`.
    #[must_use]
    pub fn sample_x(&self, index: usize) -> f64 {
        (self.min + index as f64 * self.step).min(self.max)
    }

    /// Iterator over every sampled x coordinate in increasing order.
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(|index| self.sample_x(index))
    }
}

impl Default for SamplingDomain {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
            step: Self::DEFAULT_STEP,
        }
    }
}

/// Reasons a sampling domain is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SamplingError {
    /// At least one bound is infinite or NaN.
    #[error("sampling bounds must be finite (received {min}..={max})")]
    NonFiniteBounds {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// The upper bound lies below the lower bound.
    #[error("sampling upper bound {max} lies below lower bound {min}")]
    InvertedBounds {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// The domain would produce more than [`SamplingDomain::MAX_SAMPLES`] samples.
    #[error(
        "sampling {min}..={max} at step {step} exceeds {} samples",
        SamplingDomain::MAX_SAMPLES
    )]
    TooManySamples {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
        /// Requested step.
        step: f64,
    },
    /// The step is not a positive finite number.
    #[error("sampling step must be positive and finite (received {step})")]
    InvalidStep {
        /// Requested step.
        step: f64,
    },
}

/// Single instruction of a drawing-space polyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Starts a new segment at the point.
    MoveTo(DVec2),
    /// Connects the previous point to this one with a straight line.
    LineTo(DVec2),
}

impl PathCommand {
    /// Drawing-space point targeted by the command.
    #[must_use]
    pub const fn point(&self) -> DVec2 {
        match *self {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => point,
        }
    }
}

/// Polyline approximation of the model curve in drawing space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurvePath {
    commands: Vec<PathCommand>,
}

impl CurvePath {
    /// Commands in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Iterator over the sampled drawing-space points.
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.commands.iter().map(PathCommand::point)
    }

    /// Number of samples contained in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Reports whether the path contains no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Samples the curve over `domain` and maps every sample through `transform`.
#[must_use]
pub fn sample_path(
    coefficients: Coefficients,
    mode: Mode,
    domain: &SamplingDomain,
    transform: &CanvasTransform,
) -> CurvePath {
    let commands = domain
        .xs()
        .enumerate()
        .map(|(index, x)| {
            let y = evaluate(x, coefficients, mode);
            let point = transform.to_canvas(DVec2::new(x, y));
            if index == 0 {
                PathCommand::MoveTo(point)
            } else {
                PathCommand::LineTo(point)
            }
        })
        .collect();

    CurvePath { commands }
}

#[derive(Clone, Debug)]
struct CachedPath {
    coefficients: Coefficients,
    mode: Mode,
    transform: CanvasTransform,
    path: CurvePath,
}

impl CachedPath {
    fn matches(&self, coefficients: Coefficients, mode: Mode, transform: CanvasTransform) -> bool {
        self.coefficients == coefficients && self.mode == mode && self.transform == transform
    }
}

/// Sampling system that memoizes the most recent curve path.
#[derive(Clone, Debug, Default)]
pub struct CurveSampler {
    domain: SamplingDomain,
    cached: Option<CachedPath>,
}

impl CurveSampler {
    /// Creates a sampler over the provided domain.
    #[must_use]
    pub const fn new(domain: SamplingDomain) -> Self {
        Self {
            domain,
            cached: None,
        }
    }

    /// Domain sampled by the system.
    #[must_use]
    pub const fn domain(&self) -> &SamplingDomain {
        &self.domain
    }

    /// Consumes world events, dropping the memoized path when its inputs changed.
    pub fn handle(&mut self, events: &[Event]) {
        let invalidated = events.iter().any(|event| {
            matches!(
                event,
                Event::CoefficientChanged { .. }
                    | Event::ModeChanged { .. }
                    | Event::LevelStarted { .. }
            )
        });
        if invalidated {
            self.cached = None;
        }
    }

    /// Returns the path for the inputs, resampling only when they differ from the cached key.
    pub fn path(
        &mut self,
        coefficients: Coefficients,
        mode: Mode,
        transform: CanvasTransform,
    ) -> &CurvePath {
        if self
            .cached
            .as_ref()
            .is_some_and(|cached| !cached.matches(coefficients, mode, transform))
        {
            self.cached = None;
        }

        let domain = self.domain;
        &self
            .cached
            .get_or_insert_with(|| CachedPath {
                coefficients,
                mode,
                transform,
                path: sample_path(coefficients, mode, &domain, &transform),
            })
            .path
    }

    /// Reports whether a memoized path is currently held.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_domain_yields_321_samples() {
        let domain = SamplingDomain::default();
        assert_eq!(domain.sample_count(), 321);
        assert_eq!(domain.sample_x(0), -8.0);
        assert_eq!(domain.sample_x(320), 8.0);
    }

    #[test]
    fn sample_count_excludes_partial_trailing_step() {
        let domain = SamplingDomain::new(0.0, 1.0, 0.3).expect("valid domain");
        assert_eq!(domain.sample_count(), 4);
        assert!(domain.xs().all(|x| x <= 1.0));
    }

    #[test]
    fn degenerate_domain_samples_once() {
        let domain = SamplingDomain::new(2.0, 2.0, 0.5).expect("valid domain");
        assert_eq!(domain.xs().collect::<Vec<_>>(), vec![2.0]);
    }

    #[test]
    fn invalid_domains_are_rejected() {
        assert_eq!(
            SamplingDomain::new(1.0, -1.0, 0.1),
            Err(SamplingError::InvertedBounds {
                min: 1.0,
                max: -1.0
            })
        );
        assert_eq!(
            SamplingDomain::new(-1.0, 1.0, 0.0),
            Err(SamplingError::InvalidStep { step: 0.0 })
        );
        assert!(SamplingDomain::new(f64::NEG_INFINITY, 1.0, 0.1).is_err());
    }

    #[test]
    fn oversized_domains_are_rejected() {
        assert_eq!(
            SamplingDomain::new(-1e300, 1e300, 1e-300),
            Err(SamplingError::TooManySamples {
                min: -1e300,
                max: 1e300,
                step: 1e-300
            })
        );
        assert!(matches!(
            SamplingDomain::new(0.0, 1.0, 1e-7),
            Err(SamplingError::TooManySamples { .. })
        ));

        let largest = SamplingDomain::new(0.0, 999_999.0, 1.0).expect("within the cap");
        assert_eq!(largest.sample_count(), SamplingDomain::MAX_SAMPLES);
    }

    #[test]
    fn cache_is_dropped_on_coefficient_change() {
        let mut sampler = CurveSampler::default();
        let _ = sampler.path(Coefficients::INITIAL, Mode::Linear, CanvasTransform::default());
        assert!(sampler.is_cached());

        sampler.handle(&[Event::SolutionChecked { succeeded: false }]);
        assert!(sampler.is_cached(), "unrelated events keep the cache");

        sampler.handle(&[Event::ModeChanged { mode: Mode::Cubic }]);
        assert!(!sampler.is_cached());
    }
}
