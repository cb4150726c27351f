use nalgebra::Point2;

use crate::geometry::{GridLine, Origin, ViewportBounds};
use crate::origin::{resolved_origins, DEFAULT_ORIGIN_EPSILON};
use crate::settings::GridSpec;

/// Every visible grid line for one frame, for all resolved origins in order.
pub fn render_overlay(
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    viewport: &ViewportBounds,
) -> Vec<GridLine> {
    render_overlay_with_epsilon(spec, selected_artboard_origins, viewport, DEFAULT_ORIGIN_EPSILON)
}

pub fn render_overlay_with_epsilon(
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    viewport: &ViewportBounds,
    epsilon: f64,
) -> Vec<GridLine> {
    let origins = resolved_origins(spec, selected_artboard_origins, epsilon);
    let generator = spec.grid_kind.generator();
    let lines: Vec<GridLine> = origins
        .iter()
        .flat_map(|&origin| generator.generate_lines(origin, viewport))
        .collect();
    log::trace!("Grid overlay: {} line(s) from {} origin(s)", lines.len(), origins.len());
    lines
}

/// Grid intersections inside the viewport, for dot display.
pub fn render_dots(
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    viewport: &ViewportBounds,
) -> Vec<Point2<f64>> {
    render_dots_with_epsilon(spec, selected_artboard_origins, viewport, DEFAULT_ORIGIN_EPSILON)
}

pub fn render_dots_with_epsilon(
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    viewport: &ViewportBounds,
    epsilon: f64,
) -> Vec<Point2<f64>> {
    let generator = spec.grid_kind.generator();
    resolved_origins(spec, selected_artboard_origins, epsilon)
        .into_iter()
        .flat_map(|origin| generator.intersections(origin, viewport))
        .collect()
}
