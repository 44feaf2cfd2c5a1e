use curve_fit_core::{Coefficients, Mode, Notification, Point, TargetSet};
use curve_fit_rendering::{Presentation, RenderingBackend, Scene, Theme, ViewportPresentation};
use curve_fit_rendering_svg::{path_data, render_document, SvgBackend};
use curve_fit_system_curve_sampling::{sample_path, SamplingDomain};

fn presentation(notification: Option<Notification>) -> Presentation {
    let viewport = ViewportPresentation::default();
    let coefficients = Coefficients::new(1.0, 0.0, 0.0);
    let targets = TargetSet::new(vec![Point::new(0, 0), Point::new(2, 2)]).expect("valid");
    let curve = sample_path(
        coefficients,
        Mode::Linear,
        &SamplingDomain::default(),
        viewport.transform(),
    );
    let scene = Scene::new(
        viewport,
        Mode::Linear,
        coefficients,
        &targets,
        curve,
        notification,
    );
    Presentation::new("Curve Fit", Theme::Dark, scene)
}

#[test]
fn path_data_starts_with_move_and_continues_with_lines() {
    let presentation = presentation(None);
    let data = path_data(&presentation.scene.curve);

    assert!(data.starts_with("M -20 620 L "), "unexpected start: {}", &data[..20]);
    assert_eq!(data.matches('M').count(), 1);
    assert_eq!(data.matches('L').count(), 320);
    assert!(data.ends_with("L 620 -20"));
}

#[test]
fn document_contains_grid_axes_curve_and_targets() {
    let document = render_document(&presentation(None)).expect("document renders");

    assert!(document.starts_with("<svg "));
    assert!(document.trim_end().ends_with("</svg>"));
    assert!(document.contains(r#"viewBox="0 0 600 600""#));
    assert_eq!(document.matches("<circle class=\"target-point\"").count(), 2);
    assert!(document.contains(r#"cx="300" cy="300" r="9""#));
    assert!(document.contains(r#"cx="380" cy="220" r="9""#));
    assert!(document.contains(r#"<line x1="0" y1="300" x2="600" y2="300"/>"#));
    assert!(document.contains("y = 1.00x + 0.00"));
    assert!(!document.contains("notification"));
}

#[test]
fn pending_notification_is_drawn_with_result_class() {
    let success = render_document(&presentation(Some(Notification::new(true)))).expect("renders");
    assert!(success.contains(r#"class="notification success""#));

    let failure = render_document(&presentation(Some(Notification::new(false)))).expect("renders");
    assert!(failure.contains(r#"class="notification fail""#));
}

#[test]
fn backend_keeps_last_document_and_writes_output_file() {
    let path = std::env::temp_dir().join(format!("curve-fit-svg-{}.svg", std::process::id()));
    let mut backend = SvgBackend::new().with_output(&path);

    backend
        .present(&presentation(None))
        .expect("present succeeds");

    let written = std::fs::read_to_string(&path).expect("svg file exists");
    assert_eq!(Some(written.as_str()), backend.last_document());
    std::fs::remove_file(&path).expect("cleanup temp svg");
}
