use curve_fit_core::{evaluate, CanvasTransform, Coefficient, Coefficients, Event, Mode};
use curve_fit_system_curve_sampling::{sample_path, CurveSampler, PathCommand, SamplingDomain};
use glam::DVec2;

#[test]
fn path_starts_a_segment_and_connects_the_rest() {
    let path = sample_path(
        Coefficients::INITIAL,
        Mode::Quadratic,
        &SamplingDomain::default(),
        &CanvasTransform::default(),
    );

    assert_eq!(path.len(), 321);
    assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
    assert!(path.commands()[1..]
        .iter()
        .all(|command| matches!(command, PathCommand::LineTo(_))));
}

#[test]
fn samples_use_the_canvas_transform() {
    let transform = CanvasTransform::default();
    let coefficients = Coefficients::new(0.5, -1.0, 2.0);
    let path = sample_path(
        coefficients,
        Mode::Cubic,
        &SamplingDomain::default(),
        &transform,
    );

    let first = path.commands()[0].point();
    let expected_y = evaluate(-8.0, coefficients, Mode::Cubic);
    assert_eq!(first, DVec2::new(300.0 - 8.0 * 40.0, 300.0 - expected_y * 40.0));

    let last = path.points().last().expect("path has samples");
    assert_eq!(last.x, 300.0 + 8.0 * 40.0);
}

#[test]
fn increasing_line_moves_up_the_canvas() {
    let path = sample_path(
        Coefficients::new(1.0, 0.0, 0.0),
        Mode::Linear,
        &SamplingDomain::default(),
        &CanvasTransform::default(),
    );

    let ys: Vec<f64> = path.points().map(|point| point.y).collect();
    assert!(
        ys.windows(2).all(|pair| pair[1] < pair[0]),
        "drawing-space y must decrease as model-space y grows"
    );
}

#[test]
fn sampling_is_restartable() {
    let domain = SamplingDomain::new(-2.0, 2.0, 0.25).expect("valid domain");
    let transform = CanvasTransform::new(200.0, 100.0, 10.0);
    let coefficients = Coefficients::new(1.5, 0.0, -1.0);

    let first = sample_path(coefficients, Mode::Quadratic, &domain, &transform);
    let second = sample_path(coefficients, Mode::Quadratic, &domain, &transform);
    assert_eq!(first, second);
    assert_eq!(first.len(), 17);
}

#[test]
fn sampler_reuses_path_until_inputs_change() {
    let mut sampler = CurveSampler::new(SamplingDomain::default());
    let transform = CanvasTransform::default();

    let first = sampler
        .path(Coefficients::INITIAL, Mode::Quadratic, transform)
        .clone();
    let repeated = sampler
        .path(Coefficients::INITIAL, Mode::Quadratic, transform)
        .clone();
    assert_eq!(first, repeated);

    let changed = Coefficients::INITIAL.with(Coefficient::C, 2.0);
    sampler.handle(&[Event::CoefficientChanged {
        coefficient: Coefficient::C,
        value: 2.0,
    }]);
    assert!(!sampler.is_cached());

    let updated = sampler.path(changed, Mode::Quadratic, transform).clone();
    assert_ne!(first, updated);
    assert_eq!(
        updated,
        sample_path(changed, Mode::Quadratic, &SamplingDomain::default(), &transform)
    );
}

#[test]
fn sampler_resamples_when_key_differs_without_events() {
    let mut sampler = CurveSampler::default();
    let transform = CanvasTransform::default();

    let quadratic = sampler
        .path(Coefficients::INITIAL, Mode::Quadratic, transform)
        .clone();
    let cubic = sampler
        .path(Coefficients::INITIAL, Mode::Cubic, transform)
        .clone();
    assert_ne!(quadratic, cubic);
}
