#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Curve Fit.
//!
//! The [`World`] owns the only mutable gameplay state: the active curve
//! family, the player's coefficients, the current targets and the pending
//! result notification. Every mutation goes through [`apply`], which runs to
//! completion and reports what happened as [`Event`] values.

use curve_fit_core::{
    Coefficients, Command, Event, Mode, Notification, PointCount, TargetSet, DEFAULT_TOLERANCE,
};
use curve_fit_system_point_generation::{generate, CoordinateSource, RngSource};
use curve_fit_system_solution_check::check;
use thiserror::Error;

const TARGET_GENERATION_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Represents the authoritative Curve Fit session state.
#[derive(Debug)]
pub struct World<S = RngSource> {
    mode: Mode,
    coefficients: Coefficients,
    targets: TargetSet,
    last_check: Option<bool>,
    pending_notification: Option<Notification>,
    tolerance: f64,
    source: S,
}

impl World {
    /// Creates a new session using the default generation seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(TARGET_GENERATION_SEED)
    }

    /// Creates a new session whose targets derive from the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(RngSource::from_seed(seed))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CoordinateSource> World<S> {
    /// Creates a new session drawing target coordinates from `source`.
    ///
    /// The session starts in the default mode with initial coefficients and a
    /// freshly generated target set.
    #[must_use]
    pub fn with_source(mut source: S) -> Self {
        let mode = Mode::default();
        let targets = generate(PointCount::for_mode(mode), &mut source);
        Self {
            mode,
            coefficients: Coefficients::INITIAL,
            targets,
            last_check: None,
            pending_notification: None,
            tolerance: DEFAULT_TOLERANCE,
            source,
        }
    }

    /// Overrides the tolerance used when checking solutions.
    ///
    /// The tolerance must be finite and positive; otherwise no check could
    /// ever pass.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, ToleranceError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ToleranceError { tolerance });
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    fn start_level(&mut self, targets: TargetSet, out_events: &mut Vec<Event>) {
        self.coefficients = Coefficients::INITIAL;
        self.targets = targets;
        self.last_check = None;
        self.pending_notification = None;
        log::debug!(
            "started {} level with {} targets",
            self.mode,
            self.targets.len()
        );
        out_events.push(Event::LevelStarted {
            mode: self.mode,
            targets: self.targets.clone(),
        });
    }

    fn regenerate_level(&mut self, out_events: &mut Vec<Event>) {
        let targets = generate(PointCount::for_mode(self.mode), &mut self.source);
        self.start_level(targets, out_events);
    }
}

/// Error returned when a solution tolerance is not a finite positive number.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("tolerance must be finite and positive (received {tolerance})")]
pub struct ToleranceError {
    /// Rejected tolerance.
    pub tolerance: f64,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply<S: CoordinateSource>(
    world: &mut World<S>,
    command: Command,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::SetCoefficient { coefficient, value } => {
            world.coefficients.set(coefficient, value);
            out_events.push(Event::CoefficientChanged { coefficient, value });
        }
        Command::ChangeMode { mode } => {
            world.mode = mode;
            out_events.push(Event::ModeChanged { mode });
            world.regenerate_level(out_events);
        }
        Command::Check => {
            let succeeded = check(
                world.coefficients,
                world.mode,
                &world.targets,
                world.tolerance,
            );
            log::debug!("solution check for {} level: {succeeded}", world.mode);
            world.last_check = Some(succeeded);
            world.pending_notification = Some(Notification::new(succeeded));
            out_events.push(Event::SolutionChecked { succeeded });
        }
        Command::Acknowledge => {
            let Some(notification) = world.pending_notification.take() else {
                return;
            };
            let succeeded = notification.succeeded();
            out_events.push(Event::NotificationDismissed { succeeded });
            if succeeded {
                world.regenerate_level(out_events);
            }
        }
        Command::LoadLevel { mode, targets } => {
            if world.mode != mode {
                world.mode = mode;
                out_events.push(Event::ModeChanged { mode });
            }
            world.start_level(targets, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use curve_fit_core::{Coefficients, GameState, Mode, Notification, TargetSet};

    /// Curve family currently being fitted.
    #[must_use]
    pub fn mode<S>(world: &World<S>) -> Mode {
        world.mode
    }

    /// Coefficients currently chosen by the player.
    #[must_use]
    pub fn coefficients<S>(world: &World<S>) -> Coefficients {
        world.coefficients
    }

    /// Targets of the current level.
    #[must_use]
    pub fn targets<S>(world: &World<S>) -> &TargetSet {
        &world.targets
    }

    /// Result of the most recent check in the current level.
    #[must_use]
    pub fn last_check<S>(world: &World<S>) -> Option<bool> {
        world.last_check
    }

    /// Notification awaiting acknowledgement, if any.
    #[must_use]
    pub fn pending_notification<S>(world: &World<S>) -> Option<Notification> {
        world.pending_notification
    }

    /// Tolerance applied when checking solutions.
    #[must_use]
    pub fn tolerance<S>(world: &World<S>) -> f64 {
        world.tolerance
    }

    /// Captures a snapshot of the complete gameplay state.
    #[must_use]
    pub fn game_state<S>(world: &World<S>) -> GameState {
        GameState {
            mode: world.mode,
            coefficients: world.coefficients,
            targets: world.targets.clone(),
            last_check_succeeded: world.last_check,
            pending_notification: world.pending_notification,
        }
    }
}
