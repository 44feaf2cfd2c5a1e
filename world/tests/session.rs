use std::collections::HashSet;

use curve_fit_core::{Coefficient, Coefficients, Command, Event, Mode, Point, TargetSet};
use curve_fit_world::{self as world, query, World};

fn distinct_x(targets: &TargetSet) -> bool {
    let xs: HashSet<i32> = targets.iter().map(|point| point.x()).collect();
    xs.len() == targets.len()
}

#[test]
fn change_mode_resets_coefficients_and_regenerates_targets() {
    let mut world = World::with_seed(0x1234_5678);
    let mut events = Vec::new();

    for mode in [Mode::Cubic, Mode::Linear, Mode::Quadratic, Mode::Cubic] {
        world::apply(
            &mut world,
            Command::SetCoefficient {
                coefficient: Coefficient::A,
                value: -2.5,
            },
            &mut events,
        );
        world::apply(&mut world, Command::ChangeMode { mode }, &mut events);

        assert_eq!(query::mode(&world), mode);
        assert_eq!(query::coefficients(&world), Coefficients::INITIAL);
        let targets = query::targets(&world);
        assert_eq!(targets.len(), mode.point_count().get());
        assert!(distinct_x(targets));
    }
}

#[test]
fn change_mode_announces_mode_then_level() {
    let mut world = World::with_seed(3);
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::ChangeMode { mode: Mode::Linear },
        &mut events,
    );

    assert_eq!(events.len(), 2);
    assert_eq!(events[0], Event::ModeChanged { mode: Mode::Linear });
    match &events[1] {
        Event::LevelStarted { mode, targets } => {
            assert_eq!(*mode, Mode::Linear);
            assert_eq!(targets, query::targets(&world));
        }
        other => panic!("unexpected event emitted: {other:?}"),
    }
}

#[test]
fn change_mode_clears_pending_notification() {
    let mut world = World::with_seed(11);
    let mut events = Vec::new();

    world::apply(&mut world, Command::Check, &mut events);
    assert!(query::pending_notification(&world).is_some());

    world::apply(
        &mut world,
        Command::ChangeMode { mode: Mode::Cubic },
        &mut events,
    );
    assert!(query::pending_notification(&world).is_none());
    assert_eq!(query::last_check(&world), None);
}

#[test]
fn check_does_not_mutate_level() {
    let mut world = World::with_seed(5);
    let before = query::game_state(&world);
    let mut events = Vec::new();

    world::apply(&mut world, Command::Check, &mut events);

    let after = query::game_state(&world);
    assert_eq!(after.mode, before.mode);
    assert_eq!(after.coefficients, before.coefficients);
    assert_eq!(after.targets, before.targets);
    assert!(after.last_check_succeeded.is_some());
}

#[test]
fn loaded_level_can_be_solved_and_advanced() {
    let mut world = World::with_seed(21);
    let mut events = Vec::new();
    let targets = TargetSet::new(vec![Point::new(0, 1), Point::new(2, -3)]).expect("valid");

    world::apply(
        &mut world,
        Command::LoadLevel {
            mode: Mode::Linear,
            targets: targets.clone(),
        },
        &mut events,
    );
    assert_eq!(query::mode(&world), Mode::Linear);
    assert_eq!(query::targets(&world), &targets);

    // y = -2x + 1
    for (coefficient, value) in [(Coefficient::A, -2.0), (Coefficient::B, 1.0)] {
        world::apply(
            &mut world,
            Command::SetCoefficient { coefficient, value },
            &mut events,
        );
    }
    events.clear();
    world::apply(&mut world, Command::Check, &mut events);
    assert_eq!(events, vec![Event::SolutionChecked { succeeded: true }]);

    world::apply(&mut world, Command::Acknowledge, &mut events);
    assert_eq!(query::mode(&world), Mode::Linear);
    assert_eq!(query::coefficients(&world), Coefficients::INITIAL);
    assert_eq!(query::targets(&world).len(), 2);
}

#[test]
fn loading_a_level_in_the_active_mode_skips_mode_change() {
    let mut world = World::with_seed(8);
    let mut events = Vec::new();
    let targets =
        TargetSet::new(vec![Point::new(-4, 0), Point::new(0, 0), Point::new(3, 3)]).expect("valid");

    world::apply(
        &mut world,
        Command::LoadLevel {
            mode: Mode::Quadratic,
            targets: targets.clone(),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::LevelStarted {
            mode: Mode::Quadratic,
            targets,
        }]
    );
}

#[test]
fn tolerance_override_is_used_by_checks() {
    let targets = TargetSet::new(vec![Point::new(0, 0), Point::new(1, 1)]).expect("valid");
    let mut world = World::with_seed(2)
        .with_tolerance(2.0)
        .expect("valid tolerance");
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::LoadLevel {
            mode: Mode::Linear,
            targets,
        },
        &mut events,
    );
    // y = x + 1.5 misses both targets by 1.5, which is inside the widened tolerance.
    world::apply(
        &mut world,
        Command::SetCoefficient {
            coefficient: Coefficient::B,
            value: 1.5,
        },
        &mut events,
    );
    world::apply(&mut world, Command::Check, &mut events);
    assert_eq!(query::last_check(&world), Some(true));
}
