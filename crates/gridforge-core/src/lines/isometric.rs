use nalgebra::{Point2, Vector2};

use super::{GridGenerator, SnapLine, MAX_GRID_DOTS, MAX_LINES_PER_FAMILY, MAX_SEARCH_COLUMNS};
use crate::geometry::{
    bracketing_steps, clip_line, is_finite_point, nearest_step, positive_spacing, steps_within, GridLine, Origin,
    Steps, ViewportBounds,
};
use crate::settings::IsometricGrid;

/// Relative tolerance for vertical lines to count as passing through the
/// crossings of the angled families.
const LATTICE_EPSILON: f64 = 1e-9;

impl IsometricGrid {
    fn row_spacing(&self) -> Option<f64> {
        positive_spacing(self.y_axis_spacing)
    }

    /// Slopes of the two angled families: `angle_a` falls to the right,
    /// `angle_b` rises to the right.
    fn slopes(&self) -> [f64; 2] {
        [-self.angle_a.to_radians().tan(), self.angle_b.to_radians().tan()]
    }

    /// Horizontal distance between the columns where the two angled families
    /// cross. `None` when they are parallel.
    fn lattice_column_spacing(&self) -> Option<f64> {
        let rows = self.row_spacing()?;
        let [slope_a, slope_b] = self.slopes();
        positive_spacing(rows / (slope_b - slope_a).abs())
    }

    /// Horizontal distance between vertical lines.
    fn column_spacing(&self) -> Option<f64> {
        match self.vertical_spacing {
            Some(spacing) => positive_spacing(spacing),
            None => self.lattice_column_spacing(),
        }
    }

    /// Whether all three families meet at common points.
    fn is_lattice(&self) -> bool {
        match (self.vertical_spacing, self.lattice_column_spacing()) {
            (None, _) => true,
            (Some(spacing), Some(lattice)) => (spacing - lattice).abs() <= LATTICE_EPSILON * lattice,
            (Some(_), None) => false,
        }
    }

    /// Smallest distance between neighbouring lines of one family, measured
    /// perpendicular to the lines.
    pub(crate) fn finest_spacing(&self) -> Option<f64> {
        let rows = self.row_spacing()?;
        [self.angle_a, self.angle_b]
            .map(|angle| rows * angle.to_radians().cos().abs())
            .into_iter()
            .chain(self.column_spacing())
            .filter_map(positive_spacing)
            .reduce(f64::min)
    }
}

/// Value shared by every point of one line of an angled family.
fn intercept(point: &Point2<f64>, origin: Origin, slope: f64) -> f64 {
    point.y - slope * (point.x - origin.x)
}

/// Closest point to `point` where a line of the family with `slope` crosses
/// a vertical line, with vertical lines `columns` apart.
fn nearest_on_columns(
    origin: Origin,
    point: Point2<f64>,
    columns: f64,
    rows: f64,
    slope: f64,
) -> Option<(Point2<f64>, f64)> {
    // The best point of the closest column is at most this far away, so
    // columns further out horizontally cannot win
    let reach = 0.5 * columns.hypot(rows);
    let mut first = ((point.x - reach - origin.x) / columns).ceil();
    let mut last = ((point.x + reach - origin.x) / columns).floor();
    if last - first + 1.0 > MAX_SEARCH_COLUMNS as f64 {
        let center = ((point.x - origin.x) / columns).round();
        let half = (MAX_SEARCH_COLUMNS / 2) as f64;
        first = center - half;
        last = center + half - 1.0;
    }
    if !first.is_finite() || !last.is_finite() {
        return None;
    }

    let mut best: Option<(Point2<f64>, f64)> = None;
    for column in first as i64..=last as i64 {
        let x = origin.x + column as f64 * columns;
        let y = nearest_step(point.y, origin.y + slope * (x - origin.x), rows);
        let candidate = Point2::new(x, y);
        let distance = nalgebra::distance(&candidate, &point);
        if !distance.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best
}

/// Appends the crossings of the family with `slope` and vertical lines
/// `columns` apart inside `viewport`. Returns `false` when that would
/// exceed `MAX_GRID_DOTS` in total.
fn push_column_dots(
    dots: &mut Vec<Point2<f64>>,
    origin: Origin,
    viewport: &ViewportBounds,
    columns: f64,
    rows: f64,
    slope: f64,
) -> bool {
    let range = match steps_within(viewport.min.x, viewport.max.x, origin.x, columns, MAX_GRID_DOTS) {
        Steps::Range(range) => range,
        Steps::TooDense(_) => return false,
        Steps::Empty => return true,
    };

    let estimate = dots.len() as f64 + range.clone().count() as f64 * ((viewport.height() / rows).floor() + 1.0);
    if estimate > MAX_GRID_DOTS as f64 {
        return false;
    }

    for column in range {
        let lattice_x = origin.x + column as f64 * columns;
        let x = lattice_x.clamp(viewport.min.x, viewport.max.x);
        let offset = origin.y + slope * (lattice_x - origin.x);
        if let Steps::Range(rows_in_view) = steps_within(viewport.min.y, viewport.max.y, offset, rows, MAX_GRID_DOTS) {
            for row in rows_in_view {
                let y = (offset + row as f64 * rows).clamp(viewport.min.y, viewport.max.y);
                dots.push(Point2::new(x, y));
            }
        }
    }
    true
}

impl GridGenerator for IsometricGrid {
    fn generate_lines(&self, origin: Origin, viewport: &ViewportBounds) -> Vec<GridLine> {
        let mut lines = Vec::new();
        if !viewport.is_valid() || !is_finite_point(&origin) {
            return lines;
        }
        let Some(rows) = self.row_spacing() else {
            return lines;
        };

        if let Some(columns) = self.column_spacing() {
            match steps_within(viewport.min.x, viewport.max.x, origin.x, columns, MAX_LINES_PER_FAMILY) {
                Steps::Range(range) => {
                    for index in range {
                        let x = (origin.x + index as f64 * columns).clamp(viewport.min.x, viewport.max.x);
                        lines.push(GridLine::new(Point2::new(x, viewport.min.y), Point2::new(x, viewport.max.y)));
                    }
                }
                Steps::TooDense(count) => log::debug!("Skipping vertical isometric lines: {} would be visible", count),
                Steps::Empty => {}
            }
        }

        for slope in self.slopes() {
            if !slope.is_finite() {
                continue;
            }
            // The intercepts at the corners bound every line crossing the viewport
            let (low, high) = viewport
                .corners()
                .iter()
                .map(|corner| intercept(corner, origin, slope))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
                    (low.min(value), high.max(value))
                });

            match steps_within(low, high, origin.y, rows, MAX_LINES_PER_FAMILY) {
                Steps::Range(range) => {
                    let direction = Vector2::new(1.0, slope);
                    for index in range {
                        let anchor = Point2::new(origin.x, origin.y + index as f64 * rows);
                        if let Some(line) = clip_line(anchor, direction, viewport) {
                            lines.push(line);
                        }
                    }
                }
                Steps::TooDense(count) => {
                    log::debug!("Skipping isometric lines with slope {:.3}: {} would be visible", slope, count)
                }
                Steps::Empty => {}
            }
        }
        lines
    }

    // On a lattice every crossing is shared by all three families. Otherwise
    // the nearest crossing of each pair of families is compared.
    fn nearest_intersection(&self, origin: Origin, point: Point2<f64>) -> Option<Point2<f64>> {
        let rows = self.row_spacing()?;
        if !is_finite_point(&origin) || !is_finite_point(&point) {
            return None;
        }
        let [slope_a, slope_b] = self.slopes();

        // Crossings of the two angled families
        let mut best = self
            .lattice_column_spacing()
            .and_then(|columns| nearest_on_columns(origin, point, columns, rows, slope_b));

        if !self.is_lattice() {
            if let Some(columns) = self.column_spacing() {
                for slope in [slope_a, slope_b] {
                    let Some((candidate, distance)) = nearest_on_columns(origin, point, columns, rows, slope) else {
                        continue;
                    };
                    if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                        best = Some((candidate, distance));
                    }
                }
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    // Up to 6 lines around a point, 2 vertical and 2 for each angle
    fn snap_lines(&self, origin: Origin, point: Point2<f64>) -> Vec<SnapLine> {
        let mut lines = Vec::new();
        if !is_finite_point(&origin) || !is_finite_point(&point) {
            return lines;
        }
        let Some(rows) = self.row_spacing() else {
            return lines;
        };

        if let Some(columns) = self.column_spacing() {
            for x in bracketing_steps(point.x, origin.x, columns) {
                lines.push(SnapLine::new(Point2::new(x, origin.y), Vector2::y()));
            }
        }

        for slope in self.slopes() {
            if !slope.is_finite() {
                continue;
            }
            for y in bracketing_steps(intercept(&point, origin, slope), origin.y, rows) {
                lines.push(SnapLine::new(Point2::new(origin.x, y), Vector2::new(1.0, slope)));
            }
        }
        lines
    }

    fn intersections(&self, origin: Origin, viewport: &ViewportBounds) -> Vec<Point2<f64>> {
        if !viewport.is_valid() || !is_finite_point(&origin) {
            return Vec::new();
        }
        let Some(rows) = self.row_spacing() else {
            return Vec::new();
        };
        let [slope_a, slope_b] = self.slopes();

        let mut passes = Vec::new();
        if let Some(columns) = self.lattice_column_spacing() {
            passes.push((columns, slope_b));
        }
        if !self.is_lattice() {
            if let Some(columns) = self.column_spacing() {
                passes.push((columns, slope_a));
                if slope_b != slope_a {
                    passes.push((columns, slope_b));
                }
            }
        }

        let mut dots = Vec::new();
        for (columns, slope) in passes {
            if !push_column_dots(&mut dots, origin, viewport, columns, rows, slope) {
                log::debug!("Skipping isometric grid dots: more than {} would be visible", MAX_GRID_DOTS);
                return Vec::new();
            }
        }
        dots
    }
}

/// Isometric grid lines anchored at `origin` and clipped to `viewport`.
///
/// Neighbouring lines of every family are `spacing` apart, measured
/// perpendicular to the lines, and both angled families sit at
/// `angle_degrees` from the horizontal. The vertical family comes first,
/// then the falling and the rising family.
pub fn generate_isometric_lines(
    origin: Origin,
    spacing: f64,
    angle_degrees: f64,
    viewport: &ViewportBounds,
) -> Vec<GridLine> {
    IsometricGrid::from_perpendicular_spacing(spacing, angle_degrees).generate_lines(origin, viewport)
}
