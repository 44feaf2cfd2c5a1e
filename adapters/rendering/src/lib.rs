#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Curve Fit adapters.
//!
//! A [`Scene`] bundles everything a backend needs to draw one frame: the
//! viewport grid, the sampled curve, the target markers, the equation
//! read-out, the coefficient sliders and the optional result notification.
//! Curve and targets are always mapped through the viewport's single
//! [`CanvasTransform`] so they stay visually consistent.

use anyhow::Result as AnyResult;
use curve_fit_core::{CanvasTransform, Coefficient, Coefficients, Mode, Notification, TargetSet};
use curve_fit_system_curve_sampling::CurvePath;
use glam::DVec2;
use std::{error::Error, fmt};

/// Radius of a target marker in drawing-space pixels.
pub const TARGET_MARKER_RADIUS: f64 = 9.0;

/// Radius of a grid intersection dot in drawing-space pixels.
pub const GRID_DOT_RADIUS: f64 = 2.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a copy with the alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Formats the color as a CSS hex string, ignoring alpha.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue)
        )
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Visual theme selected by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Dark strokes on a bright background.
    #[default]
    Light,
    /// Bright strokes on a dark background.
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Palette used to draw scenes in this theme.
    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::from_rgb_u8(0xf6, 0xf7, 0xfb),
                grid_line: Color::from_rgb_u8(0xdd, 0xe1, 0xea),
                grid_dot: Color::from_rgb_u8(0xc3, 0xc9, 0xd6),
                axis: Color::from_rgb_u8(0x44, 0x4b, 0x5a),
                curve: Color::from_rgb_u8(0x3b, 0x6c, 0xf6),
                target: Color::from_rgb_u8(0xe5, 0x48, 0x4d),
                text: Color::from_rgb_u8(0x1f, 0x23, 0x2b),
                success: Color::from_rgb_u8(0x2f, 0x95, 0x32),
                failure: Color::from_rgb_u8(0xc8, 0x2a, 0x36),
            },
            Theme::Dark => Palette {
                background: Color::from_rgb_u8(0x14, 0x17, 0x1f),
                grid_line: Color::from_rgb_u8(0x2a, 0x30, 0x3d),
                grid_dot: Color::from_rgb_u8(0x3c, 0x44, 0x55),
                axis: Color::from_rgb_u8(0xc9, 0xd1, 0xe0),
                curve: Color::from_rgb_u8(0x7d, 0xa2, 0xff),
                target: Color::from_rgb_u8(0xff, 0x6b, 0x70),
                text: Color::from_rgb_u8(0xee, 0xf1, 0xf7),
                success: Color::from_rgb_u8(0x5c, 0xd6, 0x5f),
                failure: Color::from_rgb_u8(0xff, 0x5a, 0x66),
            },
        }
    }
}

/// Colors used for every element of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind the graph.
    pub background: Color,
    /// Stroke of the grid lines.
    pub grid_line: Color,
    /// Fill of the grid intersection dots.
    pub grid_dot: Color,
    /// Stroke of the coordinate axes.
    pub axis: Color,
    /// Stroke of the sampled curve.
    pub curve: Color,
    /// Fill of the target markers.
    pub target: Color,
    /// Color of textual read-outs.
    pub text: Color,
    /// Accent of a successful notification.
    pub success: Color,
    /// Accent of a failed notification.
    pub failure: Color,
}

/// Square-cell viewport with a grid line every `scale` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportPresentation {
    transform: CanvasTransform,
}

impl ViewportPresentation {
    /// Creates a viewport descriptor.
    ///
    /// Returns an error when the size or scale is not positive and finite.
    pub fn new(transform: CanvasTransform) -> std::result::Result<Self, RenderingError> {
        let width = transform.width();
        let height = transform.height();
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidViewportSize { width, height });
        }
        let scale = transform.scale();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderingError::InvalidScale { scale });
        }
        Ok(Self { transform })
    }

    /// Transform shared by every element drawn inside the viewport.
    #[must_use]
    pub const fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    /// Viewport width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.transform.width()
    }

    /// Viewport height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.transform.height()
    }

    /// Offsets of the vertical grid lines measured from the left edge.
    #[must_use]
    pub fn vertical_grid_lines(&self) -> Vec<f64> {
        grid_offsets(self.width(), self.transform.scale())
    }

    /// Offsets of the horizontal grid lines measured from the top edge.
    #[must_use]
    pub fn horizontal_grid_lines(&self) -> Vec<f64> {
        grid_offsets(self.height(), self.transform.scale())
    }

    /// Intersections of the grid lines.
    #[must_use]
    pub fn grid_dots(&self) -> Vec<DVec2> {
        let rows = self.horizontal_grid_lines();
        self.vertical_grid_lines()
            .into_iter()
            .flat_map(|x| rows.iter().map(move |&y| DVec2::new(x, y)))
            .collect()
    }

    /// Horizontal axis as a segment across the viewport centre.
    #[must_use]
    pub fn horizontal_axis(&self) -> (DVec2, DVec2) {
        let y = self.height() / 2.0;
        (DVec2::new(0.0, y), DVec2::new(self.width(), y))
    }

    /// Vertical axis as a segment across the viewport centre.
    #[must_use]
    pub fn vertical_axis(&self) -> (DVec2, DVec2) {
        let x = self.width() / 2.0;
        (DVec2::new(x, 0.0), DVec2::new(x, self.height()))
    }
}

impl Default for ViewportPresentation {
    fn default() -> Self {
        Self {
            transform: CanvasTransform::default(),
        }
    }
}

fn grid_offsets(extent: f64, scale: f64) -> Vec<f64> {
    let count = (extent / scale).floor() as usize;
    (0..=count).map(|index| index as f64 * scale).collect()
}

/// Target point mapped into drawing space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetMarker {
    /// Centre of the marker in drawing space.
    pub center: DVec2,
    /// Radius of the marker in pixels.
    pub radius: f64,
}

impl TargetMarker {
    /// Creates a new marker descriptor.
    #[must_use]
    pub const fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Maps every target through the transform into drawing-space markers.
#[must_use]
pub fn target_markers(targets: &TargetSet, transform: &CanvasTransform) -> Vec<TargetMarker> {
    targets
        .iter()
        .map(|point| TargetMarker::new(transform.to_canvas(point.to_model()), TARGET_MARKER_RADIUS))
        .collect()
}

/// Equation read-out showing the current formula with two decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquationView {
    /// Curve family of the formula.
    pub mode: Mode,
    /// Coefficients substituted into the formula.
    pub coefficients: Coefficients,
}

impl EquationView {
    /// Creates a new equation read-out.
    #[must_use]
    pub const fn new(mode: Mode, coefficients: Coefficients) -> Self {
        Self { mode, coefficients }
    }
}

impl fmt::Display for EquationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.coefficients.a();
        let b = self.coefficients.b();
        let c = self.coefficients.c();
        match self.mode {
            Mode::Linear => write!(f, "y = {a:.2}x + {b:.2}"),
            Mode::Quadratic => write!(f, "y = {a:.2}x² + {b:.2}x + {c:.2}"),
            Mode::Cubic => write!(f, "y = {a:.2}x³ + {b:.2}x + {c:.2}"),
        }
    }
}

/// Range slider controlling one coefficient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderView {
    /// Coefficient driven by the slider.
    pub coefficient: Coefficient,
    /// Current slider value.
    pub value: f64,
}

impl SliderView {
    /// Lowest value a slider can select.
    pub const MIN: f64 = -5.0;
    /// Highest value a slider can select.
    pub const MAX: f64 = 5.0;
    /// Increment between selectable slider values.
    pub const STEP: f64 = 0.1;

    /// Creates a new slider descriptor.
    #[must_use]
    pub const fn new(coefficient: Coefficient, value: f64) -> Self {
        Self { coefficient, value }
    }

    /// Snaps an arbitrary input to the nearest selectable slider value.
    #[must_use]
    pub fn quantize(value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let clamped = value.clamp(Self::MIN, Self::MAX);
        let steps = ((clamped - Self::MIN) / Self::STEP).round();
        // Round to one decimal so repeated steps do not accumulate binary noise.
        ((Self::MIN + steps * Self::STEP) * 10.0).round() / 10.0
    }
}

/// Sliders visible for the mode; the `c` slider is hidden in linear mode.
#[must_use]
pub fn sliders_for(mode: Mode, coefficients: Coefficients) -> Vec<SliderView> {
    Coefficient::ALL
        .into_iter()
        .filter(|coefficient| mode.uses_c() || *coefficient != Coefficient::C)
        .map(|coefficient| SliderView::new(coefficient, coefficients.get(coefficient)))
        .collect()
}

/// Result notification shown after a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationView {
    /// Whether every target was matched.
    pub succeeded: bool,
}

impl From<Notification> for NotificationView {
    fn from(notification: Notification) -> Self {
        Self {
            succeeded: notification.succeeded(),
        }
    }
}

/// Scene description combining the viewport, curve, targets and controls.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewport and grid geometry.
    pub viewport: ViewportPresentation,
    /// Sampled curve in drawing space.
    pub curve: CurvePath,
    /// Targets in drawing space.
    pub targets: Vec<TargetMarker>,
    /// Current formula.
    pub equation: EquationView,
    /// Visible coefficient sliders.
    pub sliders: Vec<SliderView>,
    /// Pending result notification, if any.
    pub notification: Option<NotificationView>,
}

impl Scene {
    /// Creates a scene whose targets use the viewport's transform.
    ///
    /// `curve` must have been sampled with the same transform.
    #[must_use]
    pub fn new(
        viewport: ViewportPresentation,
        mode: Mode,
        coefficients: Coefficients,
        targets: &TargetSet,
        curve: CurvePath,
        notification: Option<Notification>,
    ) -> Self {
        Self {
            targets: target_markers(targets, viewport.transform()),
            equation: EquationView::new(mode, coefficients),
            sliders: sliders_for(mode, coefficients),
            notification: notification.map(NotificationView::from),
            viewport,
            curve,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the graph.
    pub title: String,
    /// Theme used to pick colors.
    pub theme: Theme,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, theme: Theme, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            theme,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Curve Fit scenes.
pub trait RenderingBackend {
    /// Draws the presentation to the backend's surface.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport dimensions must be positive and finite.
    InvalidViewportSize {
        /// Provided width.
        width: f64,
        /// Provided height.
        height: f64,
    },
    /// Pixel scale must be positive and finite.
    InvalidScale {
        /// Provided scale.
        scale: f64,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewportSize { width, height } => {
                write!(
                    f,
                    "viewport size must be positive (received {width}x{height})"
                )
            }
            Self::InvalidScale { scale } => {
                write!(f, "pixels per unit must be positive (received {scale})")
            }
        }
    }
}

impl Error for RenderingError {}
