#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Curve Fit engine.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically.
//!
//! The polynomial model itself lives here as [`evaluate`] because every other
//! component (sampling, checking, rendering) depends on it.

use std::{collections::HashSet, fmt, str::FromStr};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest coordinate a target point may use on either axis.
pub const COORDINATE_MIN: i32 = -4;

/// Largest coordinate a target point may use on either axis.
pub const COORDINATE_MAX: i32 = 3;

/// Number of distinct integer coordinates available on each axis.
pub const COORDINATE_SPAN: usize = (COORDINATE_MAX - COORDINATE_MIN + 1) as usize;

/// Maximum vertical distance between curve and target that still counts as a match.
pub const DEFAULT_TOLERANCE: f64 = 0.4;

/// Polynomial family the player is currently fitting.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// `y = a·x + b`.
    Linear,
    /// `y = a·x² + b·x + c`.
    #[default]
    Quadratic,
    /// `y = a·x³ + b·x + c`.
    Cubic,
}

impl Mode {
    /// Every curve family in menu order.
    pub const ALL: [Mode; 3] = [Mode::Linear, Mode::Quadratic, Mode::Cubic];

    /// Number of target points a level in this mode contains.
    #[must_use]
    pub const fn point_count(self) -> PointCount {
        PointCount::for_mode(self)
    }

    /// Reports whether the `c` coefficient participates in the formula.
    #[must_use]
    pub const fn uses_c(self) -> bool {
        !matches!(self, Mode::Linear)
    }

    /// Stable lowercase identifier of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Linear => "linear",
            Mode::Quadratic => "quadratic",
            Mode::Cubic => "cubic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseNameError::UnknownMode(trimmed.to_owned()))
    }
}

/// Names one of the three adjustable coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coefficient {
    /// Leading coefficient.
    A,
    /// Coefficient of the linear term.
    B,
    /// Constant term; ignored in linear mode.
    C,
}

impl Coefficient {
    /// Every coefficient in slider order.
    pub const ALL: [Coefficient; 3] = [Coefficient::A, Coefficient::B, Coefficient::C];

    /// Single-letter label of the coefficient.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Coefficient::A => "a",
            Coefficient::B => "b",
            Coefficient::C => "c",
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Coefficient {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Coefficient::ALL
            .into_iter()
            .find(|coefficient| coefficient.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseNameError::UnknownCoefficient(trimmed.to_owned()))
    }
}

/// Errors produced when parsing mode or coefficient names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseNameError {
    /// The provided text does not name a supported curve family.
    #[error("unknown curve mode `{0}`; expected linear, quadratic or cubic")]
    UnknownMode(String),
    /// The provided text does not name a coefficient.
    #[error("unknown coefficient `{0}`; expected a, b or c")]
    UnknownCoefficient(String),
}

/// Coefficients of the polynomial the player is adjusting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    a: f64,
    b: f64,
    c: f64,
}

impl Coefficients {
    /// Coefficients every level starts from: `{a: 1, b: 0, c: 0}`.
    pub const INITIAL: Coefficients = Coefficients::new(1.0, 0.0, 0.0);

    /// Creates a coefficient record from explicit values.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Leading coefficient.
    #[must_use]
    pub const fn a(&self) -> f64 {
        self.a
    }

    /// Coefficient of the linear term.
    #[must_use]
    pub const fn b(&self) -> f64 {
        self.b
    }

    /// Constant term.
    #[must_use]
    pub const fn c(&self) -> f64 {
        self.c
    }

    /// Reads the named coefficient.
    #[must_use]
    pub const fn get(&self, coefficient: Coefficient) -> f64 {
        match coefficient {
            Coefficient::A => self.a,
            Coefficient::B => self.b,
            Coefficient::C => self.c,
        }
    }

    /// Overwrites the named coefficient.
    pub fn set(&mut self, coefficient: Coefficient, value: f64) {
        match coefficient {
            Coefficient::A => self.a = value,
            Coefficient::B => self.b = value,
            Coefficient::C => self.c = value,
        }
    }

    /// Returns a copy with the named coefficient replaced.
    #[must_use]
    pub fn with(mut self, coefficient: Coefficient, value: f64) -> Self {
        self.set(coefficient, value);
        self
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Evaluates the polynomial of the given family at `x`.
///
/// The cubic family has no quadratic term: `y = a·x³ + b·x + c`.
#[must_use]
pub fn evaluate(x: f64, coefficients: Coefficients, mode: Mode) -> f64 {
    let Coefficients { a, b, c } = coefficients;
    match mode {
        Mode::Linear => a * x + b,
        Mode::Quadratic => a * x * x + b * x + c,
        Mode::Cubic => a * x * x * x + b * x + c,
    }
}

/// Integer target coordinate expressed in model space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point. Range checks happen when points join a [`TargetSet`].
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether both coordinates lie within `[COORDINATE_MIN, COORDINATE_MAX]`.
    #[must_use]
    pub const fn is_in_range(&self) -> bool {
        coordinate_in_range(self.x) && coordinate_in_range(self.y)
    }

    /// Point expressed as a real-valued model-space vector.
    #[must_use]
    pub fn to_model(self) -> DVec2 {
        DVec2::new(f64::from(self.x), f64::from(self.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

const fn coordinate_in_range(value: i32) -> bool {
    value >= COORDINATE_MIN && value <= COORDINATE_MAX
}

/// Number of target points requested from the generator.
///
/// Only as many points as there are distinct x values may be requested, so
/// construction rejects anything above [`COORDINATE_SPAN`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointCount(usize);

impl PointCount {
    /// Validates a requested point count.
    pub fn new(value: usize) -> Result<Self, PointCountError> {
        if value == 0 || value > COORDINATE_SPAN {
            return Err(PointCountError {
                requested: value,
                available: COORDINATE_SPAN,
            });
        }
        Ok(Self(value))
    }

    /// Point count required by a curve family: 2, 3 or 4.
    #[must_use]
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Linear => Self(2),
            Mode::Quadratic => Self(3),
            Mode::Cubic => Self(4),
        }
    }

    /// Numeric value of the count.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Error returned when a point count cannot be satisfied with distinct x values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cannot place {requested} points with distinct x values; between 1 and {available} are available")]
pub struct PointCountError {
    /// Count that was requested.
    pub requested: usize,
    /// Number of distinct x values available.
    pub available: usize,
}

/// Ordered set of target points with pairwise-distinct x values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct TargetSet {
    points: Vec<Point>,
}

impl TargetSet {
    /// Validates and wraps the provided points.
    pub fn new(points: Vec<Point>) -> Result<Self, TargetSetError> {
        validate_points(&points)?;
        Ok(Self { points })
    }

    /// Wraps points that are already known to satisfy the target-set invariants.
    ///
    /// Intended for generators that uphold distinct, in-range coordinates by
    /// construction. Debug builds still verify the invariants.
    #[must_use]
    pub fn new_unchecked(points: Vec<Point>) -> Self {
        debug_assert!(
            validate_points(&points).is_ok(),
            "target points must be in range with distinct x values"
        );
        Self { points }
    }

    /// Points in generation order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterator over the points in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Number of points contained in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the set contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<Vec<Point>> for TargetSet {
    type Error = TargetSetError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TargetSet> for Vec<Point> {
    fn from(set: TargetSet) -> Self {
        set.points
    }
}

fn validate_points(points: &[Point]) -> Result<(), TargetSetError> {
    if points.len() > COORDINATE_SPAN {
        return Err(TargetSetError::TooManyPoints {
            count: points.len(),
        });
    }

    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !point.is_in_range() {
            return Err(TargetSetError::OutOfRange { point: *point });
        }
        if !seen.insert(point.x()) {
            return Err(TargetSetError::DuplicateX { x: point.x() });
        }
    }
    Ok(())
}

/// Reasons a list of points cannot form a [`TargetSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TargetSetError {
    /// More points than distinct x values.
    #[error("target set holds {count} points but only {} distinct x values exist", COORDINATE_SPAN)]
    TooManyPoints {
        /// Number of points supplied.
        count: usize,
    },
    /// A coordinate lies outside `[COORDINATE_MIN, COORDINATE_MAX]`.
    #[error("target point {point} lies outside [{}, {}]", COORDINATE_MIN, COORDINATE_MAX)]
    OutOfRange {
        /// Offending point.
        point: Point,
    },
    /// Two points share the same x value.
    #[error("target points share x = {x}")]
    DuplicateX {
        /// Duplicated x value.
        x: i32,
    },
}

/// Linear mapping from model-space coordinates to drawing-space pixels.
///
/// Model-space y grows upward while drawing-space y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    width: f64,
    height: f64,
    scale: f64,
}

impl CanvasTransform {
    /// Default viewport width in pixels.
    pub const DEFAULT_WIDTH: f64 = 600.0;
    /// Default viewport height in pixels.
    pub const DEFAULT_HEIGHT: f64 = 600.0;
    /// Default number of pixels per model unit.
    pub const DEFAULT_SCALE: f64 = 40.0;

    /// Creates a transform for a viewport of the given size and scale.
    #[must_use]
    pub const fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    /// Viewport width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Pixels per model unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps a model-space x coordinate to drawing space.
    #[must_use]
    pub fn to_canvas_x(&self, x: f64) -> f64 {
        self.width / 2.0 + x * self.scale
    }

    /// Maps a model-space y coordinate to drawing space, flipping its sign.
    #[must_use]
    pub fn to_canvas_y(&self, y: f64) -> f64 {
        self.height / 2.0 - y * self.scale
    }

    /// Maps a model-space point to drawing space.
    #[must_use]
    pub fn to_canvas(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.to_canvas_x(point.x), self.to_canvas_y(point.y))
    }

    /// Drawing-space position of the model-space origin.
    #[must_use]
    pub fn origin(&self) -> DVec2 {
        self.to_canvas(DVec2::ZERO)
    }
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_WIDTH,
            Self::DEFAULT_HEIGHT,
            Self::DEFAULT_SCALE,
        )
    }
}

/// Result notification awaiting acknowledgement by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    succeeded: bool,
}

impl Notification {
    /// Creates a notification for the provided check result.
    #[must_use]
    pub const fn new(succeeded: bool) -> Self {
        Self { succeeded }
    }

    /// Whether the check that raised the notification succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }
}

/// Snapshot of the complete gameplay state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Curve family being fitted.
    pub mode: Mode,
    /// Coefficients currently chosen by the player.
    pub coefficients: Coefficients,
    /// Points the curve has to pass near.
    pub targets: TargetSet,
    /// Result of the most recent check within the current level, if any.
    pub last_check_succeeded: Option<bool>,
    /// Notification waiting to be acknowledged, if any.
    pub pending_notification: Option<Notification>,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Overwrites a single coefficient.
    SetCoefficient {
        /// Coefficient to overwrite.
        coefficient: Coefficient,
        /// New value for the coefficient.
        value: f64,
    },
    /// Switches to another curve family and starts a fresh level in it.
    ChangeMode {
        /// Family to activate.
        mode: Mode,
    },
    /// Checks the current curve against the targets and raises a notification.
    Check,
    /// Dismisses the pending notification, advancing the level after a success.
    Acknowledge,
    /// Starts a level with explicitly provided targets.
    LoadLevel {
        /// Family of the level.
        mode: Mode,
        /// Targets of the level.
        targets: TargetSet,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a coefficient was overwritten.
    CoefficientChanged {
        /// Coefficient that changed.
        coefficient: Coefficient,
        /// Value now stored for the coefficient.
        value: f64,
    },
    /// Announces that a different curve family became active.
    ModeChanged {
        /// Family that became active.
        mode: Mode,
    },
    /// Announces a fresh level with reset coefficients.
    LevelStarted {
        /// Family of the level.
        mode: Mode,
        /// Targets generated for the level.
        targets: TargetSet,
    },
    /// Reports the outcome of a solution check.
    SolutionChecked {
        /// Whether every target was matched within tolerance.
        succeeded: bool,
    },
    /// Confirms that the pending notification was dismissed.
    NotificationDismissed {
        /// Whether the dismissed notification reported a success.
        succeeded: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_counts_follow_mode() {
        assert_eq!(PointCount::for_mode(Mode::Linear).get(), 2);
        assert_eq!(PointCount::for_mode(Mode::Quadratic).get(), 3);
        assert_eq!(PointCount::for_mode(Mode::Cubic).get(), 4);
    }

    #[test]
    fn point_count_rejects_more_points_than_distinct_x_values() {
        assert!(PointCount::new(8).is_ok());
        let error = PointCount::new(9).expect_err("nine points cannot have distinct x");
        assert_eq!(error.requested, 9);
        assert_eq!(error.available, 8);
        assert!(PointCount::new(0).is_err());
    }

    #[test]
    fn evaluate_matches_each_family() {
        let coefficients = Coefficients::new(2.0, 3.0, 5.0);
        assert_eq!(evaluate(2.0, coefficients, Mode::Linear), 7.0);
        assert_eq!(evaluate(2.0, coefficients, Mode::Quadratic), 19.0);
        assert_eq!(evaluate(2.0, coefficients, Mode::Cubic), 27.0);
    }

    #[test]
    fn cubic_has_no_quadratic_term() {
        let y = evaluate(2.0, Coefficients::new(1.0, 0.0, 0.0), Mode::Cubic);
        assert_eq!(y, 8.0);
    }

    #[test]
    fn linear_ignores_c() {
        let without = evaluate(1.5, Coefficients::new(2.0, 1.0, 0.0), Mode::Linear);
        let with = evaluate(1.5, Coefficients::new(2.0, 1.0, 9.0), Mode::Linear);
        assert_eq!(without, with);
    }

    #[test]
    fn evaluate_is_deterministic() {
        let coefficients = Coefficients::new(-0.7, 1.3, 2.1);
        for mode in Mode::ALL {
            let first = evaluate(-3.25, coefficients, mode);
            let second = evaluate(-3.25, coefficients, mode);
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn mode_parses_case_insensitively_and_rejects_unknown_names() {
        assert_eq!("Cubic".parse::<Mode>(), Ok(Mode::Cubic));
        assert_eq!(" linear ".parse::<Mode>(), Ok(Mode::Linear));
        assert_eq!(
            "quartic".parse::<Mode>(),
            Err(ParseNameError::UnknownMode("quartic".to_owned()))
        );
        assert!(!Mode::Linear.uses_c());
        assert!(Mode::Cubic.uses_c());
        assert_eq!(Mode::default(), Mode::Quadratic);
    }

    #[test]
    fn coefficients_can_be_set_by_name() {
        let mut coefficients = Coefficients::default();
        assert_eq!(coefficients, Coefficients::INITIAL);
        coefficients.set(Coefficient::B, -2.5);
        assert_eq!(coefficients.get(Coefficient::B), -2.5);
        assert_eq!(
            coefficients.with(Coefficient::C, 4.0),
            Coefficients::new(1.0, -2.5, 4.0)
        );
        assert_eq!("C".parse::<Coefficient>(), Ok(Coefficient::C));
    }

    #[test]
    fn target_set_rejects_duplicate_x_values() {
        let error = TargetSet::new(vec![Point::new(1, 0), Point::new(1, 3)])
            .expect_err("duplicate x must be rejected");
        assert_eq!(error, TargetSetError::DuplicateX { x: 1 });
    }

    #[test]
    fn target_set_allows_duplicate_y_values() {
        let set = TargetSet::new(vec![Point::new(-4, 2), Point::new(3, 2)])
            .expect("duplicate y is allowed");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn target_set_rejects_out_of_range_points() {
        let error = TargetSet::new(vec![Point::new(0, 4)]).expect_err("y = 4 is out of range");
        assert_eq!(
            error,
            TargetSetError::OutOfRange {
                point: Point::new(0, 4)
            }
        );
    }

    #[test]
    fn target_set_deserialization_validates_points() {
        let valid = TargetSet::new(vec![Point::new(-1, -1), Point::new(2, 3)]).expect("valid");
        let bytes = bincode::serialize(&valid).expect("serialize target set");
        let decoded: TargetSet = bincode::deserialize(&bytes).expect("deserialize target set");
        assert_eq!(decoded, valid);

        let invalid = vec![Point::new(0, 0), Point::new(0, 1)];
        let bytes = bincode::serialize(&invalid).expect("serialize raw points");
        assert!(bincode::deserialize::<TargetSet>(&bytes).is_err());
    }

    #[test]
    fn canvas_transform_flips_vertical_axis() {
        let transform = CanvasTransform::default();
        assert_eq!(transform.origin(), DVec2::new(300.0, 300.0));
        assert_eq!(transform.to_canvas_x(1.0), 340.0);
        assert_eq!(transform.to_canvas_y(1.0), 260.0);
        assert_eq!(
            transform.to_canvas(DVec2::new(-2.0, -3.0)),
            DVec2::new(220.0, 420.0)
        );
    }
}
