#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! SVG rendering adapter for Curve Fit.
//!
//! The backend serialises a [`Presentation`] into a standalone SVG document
//! and optionally writes it to disk after every frame, so any browser or
//! image viewer can display the current level.

use std::{
    fmt::{self, Write as _},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use curve_fit_rendering::{
    Color, Presentation, RenderingBackend, Scene, TargetMarker, GRID_DOT_RADIUS,
};
use curve_fit_system_curve_sampling::{CurvePath, PathCommand};
use glam::DVec2;

const CURVE_STROKE_WIDTH: f64 = 3.0;
const AXIS_STROKE_WIDTH: f64 = 2.0;
const GRID_STROKE_WIDTH: f64 = 1.0;
const NOTIFICATION_BORDER_WIDTH: f64 = 8.0;
const LABEL_FONT_SIZE: f64 = 18.0;
const LABEL_MARGIN: f64 = 12.0;

/// Rendering backend that produces SVG documents.
#[derive(Debug, Default)]
pub struct SvgBackend {
    output: Option<PathBuf>,
    last_document: Option<String>,
}

impl SvgBackend {
    /// Returns a backend that keeps documents in memory only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the file every presented frame is written to.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// File the backend writes to, if any.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Document produced by the most recent call to `present`.
    #[must_use]
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }
}

impl RenderingBackend for SvgBackend {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let document = render_document(presentation)?;
        if let Some(path) = &self.output {
            fs::write(path, &document)
                .with_context(|| format!("failed to write svg frame to {}", path.display()))?;
            log::debug!("wrote svg frame to {}", path.display());
        }
        self.last_document = Some(document);
        Ok(())
    }
}

/// Serialises the presentation into an SVG document.
pub fn render_document(presentation: &Presentation) -> Result<String> {
    let mut document = String::new();
    write_document(&mut document, presentation).context("failed to format svg document")?;
    Ok(document)
}

/// Formats a curve path as SVG path data (`M x y L x y …`).
#[must_use]
pub fn path_data(path: &CurvePath) -> String {
    path.commands()
        .iter()
        .map(|command| match command {
            PathCommand::MoveTo(point) => format!("M {}", coordinate_pair(*point)),
            PathCommand::LineTo(point) => format!("L {}", coordinate_pair(*point)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_document(out: &mut String, presentation: &Presentation) -> fmt::Result {
    let scene = &presentation.scene;
    let palette = presentation.theme.palette();
    let width = number(scene.viewport.width());
    let height = number(scene.viewport.height());

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" preserveAspectRatio="xMidYMid meet">"#
    )?;
    writeln!(out, "  <title>{}</title>", escape(&presentation.title))?;
    writeln!(
        out,
        r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
        palette.background.to_hex()
    )?;

    write_grid(out, scene, palette.grid_line, palette.grid_dot)?;
    write_axes(out, scene, palette.axis)?;

    writeln!(
        out,
        r#"  <path class="curve" d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        path_data(&scene.curve),
        palette.curve.to_hex(),
        number(CURVE_STROKE_WIDTH)
    )?;

    for marker in &scene.targets {
        write_target(out, marker, palette.target)?;
    }

    writeln!(
        out,
        r#"  <text class="equation" x="{}" y="{}" font-family="monospace" font-size="{}" fill="{}">{}</text>"#,
        number(LABEL_MARGIN),
        number(LABEL_MARGIN + LABEL_FONT_SIZE),
        number(LABEL_FONT_SIZE),
        palette.text.to_hex(),
        escape(&scene.equation.to_string())
    )?;

    if let Some(notification) = scene.notification {
        let (class, color) = if notification.succeeded {
            ("success", palette.success)
        } else {
            ("fail", palette.failure)
        };
        let inset = NOTIFICATION_BORDER_WIDTH / 2.0;
        writeln!(
            out,
            r#"  <rect class="notification {class}" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            number(inset),
            number(inset),
            number(scene.viewport.width() - NOTIFICATION_BORDER_WIDTH),
            number(scene.viewport.height() - NOTIFICATION_BORDER_WIDTH),
            color.to_hex(),
            number(NOTIFICATION_BORDER_WIDTH)
        )?;
    }

    writeln!(out, "</svg>")
}

fn write_grid(out: &mut String, scene: &Scene, line: Color, dot: Color) -> fmt::Result {
    let viewport = &scene.viewport;
    let width = number(viewport.width());
    let height = number(viewport.height());

    writeln!(
        out,
        r#"  <g class="grid" stroke="{}" stroke-width="{}">"#,
        line.to_hex(),
        number(GRID_STROKE_WIDTH)
    )?;
    for x in viewport.vertical_grid_lines() {
        let x = number(x);
        writeln!(out, r#"    <line x1="{x}" y1="0" x2="{x}" y2="{height}"/>"#)?;
    }
    for y in viewport.horizontal_grid_lines() {
        let y = number(y);
        writeln!(out, r#"    <line x1="0" y1="{y}" x2="{width}" y2="{y}"/>"#)?;
    }
    writeln!(out, "  </g>")?;

    writeln!(out, r#"  <g class="grid-dots" fill="{}">"#, dot.to_hex())?;
    for center in viewport.grid_dots() {
        writeln!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{}"/>"#,
            number(center.x),
            number(center.y),
            number(GRID_DOT_RADIUS)
        )?;
    }
    writeln!(out, "  </g>")
}

fn write_axes(out: &mut String, scene: &Scene, color: Color) -> fmt::Result {
    writeln!(
        out,
        r#"  <g class="axis" stroke="{}" stroke-width="{}">"#,
        color.to_hex(),
        number(AXIS_STROKE_WIDTH)
    )?;
    for (start, end) in [
        scene.viewport.horizontal_axis(),
        scene.viewport.vertical_axis(),
    ] {
        writeln!(
            out,
            r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            number(start.x),
            number(start.y),
            number(end.x),
            number(end.y)
        )?;
    }
    writeln!(out, "  </g>")
}

fn write_target(out: &mut String, marker: &TargetMarker, color: Color) -> fmt::Result {
    writeln!(
        out,
        r#"  <circle class="target-point" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        number(marker.center.x),
        number(marker.center.y),
        number(marker.radius),
        color.to_hex()
    )
}

fn coordinate_pair(point: DVec2) -> String {
    format!("{} {}", number(point.x), number(point.y))
}

/// Formats a number with at most three decimals and no trailing zeros.
fn number(value: f64) -> String {
    // Curves far outside the viewport can overflow; keep the document valid.
    if value.is_nan() {
        return "0".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "1e9" } else { "-1e9" }.to_owned();
    }
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
