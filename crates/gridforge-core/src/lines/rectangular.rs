use nalgebra::{Point2, Vector2};

use super::{GridGenerator, SnapLine, MAX_GRID_DOTS, MAX_LINES_PER_FAMILY};
use crate::geometry::{
    bracketing_steps, is_finite_point, nearest_step, positive_spacing, steps_within, GridLine, Origin, Steps,
    ViewportBounds,
};
use crate::settings::RectangularGrid;

/// Axis 0 holds vertical lines (positions along x), axis 1 horizontal ones.
const AXIS_NAMES: [&str; 2] = ["vertical", "horizontal"];

impl RectangularGrid {
    fn axis_spacing(&self, axis: usize) -> Option<f64> {
        positive_spacing(self.spacing[axis])
    }
}

impl GridGenerator for RectangularGrid {
    fn generate_lines(&self, origin: Origin, viewport: &ViewportBounds) -> Vec<GridLine> {
        let mut lines = Vec::new();
        if !viewport.is_valid() || !is_finite_point(&origin) {
            return lines;
        }

        for axis in 0..2 {
            let Some(spacing) = self.axis_spacing(axis) else {
                continue;
            };
            let (low, high) = (viewport.min[axis], viewport.max[axis]);
            match steps_within(low, high, origin[axis], spacing, MAX_LINES_PER_FAMILY) {
                Steps::Range(range) => {
                    for index in range {
                        let position = (origin[axis] + index as f64 * spacing).clamp(low, high);
                        // Each line spans the full extent of the other axis
                        let mut start = viewport.min;
                        let mut end = viewport.max;
                        start[axis] = position;
                        end[axis] = position;
                        lines.push(GridLine::new(start, end));
                    }
                }
                Steps::TooDense(count) => {
                    log::debug!("Skipping {} grid lines: {} would be visible", AXIS_NAMES[axis], count);
                }
                Steps::Empty => {}
            }
        }
        lines
    }

    fn nearest_intersection(&self, origin: Origin, point: Point2<f64>) -> Option<Point2<f64>> {
        let spacing_x = self.axis_spacing(0)?;
        let spacing_y = self.axis_spacing(1)?;
        let snapped = Point2::new(
            nearest_step(point.x, origin.x, spacing_x),
            nearest_step(point.y, origin.y, spacing_y),
        );
        is_finite_point(&snapped).then_some(snapped)
    }

    // Up to 4 lines around a point, 2 vertical and 2 horizontal
    fn snap_lines(&self, origin: Origin, point: Point2<f64>) -> Vec<SnapLine> {
        let mut lines = Vec::new();
        if !is_finite_point(&origin) || !is_finite_point(&point) {
            return lines;
        }
        for (axis, direction) in [(0, Vector2::y()), (1, Vector2::x())] {
            let Some(spacing) = self.axis_spacing(axis) else {
                continue;
            };
            for position in bracketing_steps(point[axis], origin[axis], spacing) {
                let mut anchor = origin;
                anchor[axis] = position;
                lines.push(SnapLine::new(anchor, direction));
            }
        }
        lines
    }

    fn intersections(&self, origin: Origin, viewport: &ViewportBounds) -> Vec<Point2<f64>> {
        let mut dots = Vec::new();
        if !viewport.is_valid() || !is_finite_point(&origin) {
            return dots;
        }
        let (Some(spacing_x), Some(spacing_y)) = (self.axis_spacing(0), self.axis_spacing(1)) else {
            return dots;
        };

        let columns = steps_within(viewport.min.x, viewport.max.x, origin.x, spacing_x, MAX_GRID_DOTS);
        let rows = steps_within(viewport.min.y, viewport.max.y, origin.y, spacing_y, MAX_GRID_DOTS);
        let (Steps::Range(columns), Steps::Range(rows)) = (columns, rows) else {
            return dots;
        };

        let total = columns.clone().count() * rows.clone().count();
        if total > MAX_GRID_DOTS {
            log::debug!("Skipping grid dots: {} would be visible", total);
            return dots;
        }

        dots.reserve(total);
        for column in columns {
            let x = (origin.x + column as f64 * spacing_x).clamp(viewport.min.x, viewport.max.x);
            for row in rows.clone() {
                let y = (origin.y + row as f64 * spacing_y).clamp(viewport.min.y, viewport.max.y);
                dots.push(Point2::new(x, y));
            }
        }
        dots
    }
}

/// Rectangular grid lines anchored at `origin` and clipped to `viewport`.
///
/// Vertical lines come first (left to right), then horizontal lines (top to
/// bottom). An axis with non-positive or non-finite spacing contributes no
/// lines.
pub fn generate_rectangular_lines(
    origin: Origin,
    spacing_x: f64,
    spacing_y: f64,
    viewport: &ViewportBounds,
) -> Vec<GridLine> {
    RectangularGrid::new(spacing_x, spacing_y).generate_lines(origin, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(min: (f64, f64), max: (f64, f64)) -> ViewportBounds {
        ViewportBounds::new(Point2::new(min.0, min.1), Point2::new(max.0, max.1))
    }

    fn vertical_positions(lines: &[GridLine]) -> Vec<f64> {
        lines.iter().filter(|line| line.start.x == line.end.x).map(|line| line.start.x).collect()
    }

    fn horizontal_positions(lines: &[GridLine]) -> Vec<f64> {
        lines.iter().filter(|line| line.start.y == line.end.y).map(|line| line.start.y).collect()
    }

    #[test]
    fn test_basic_grid() {
        let view = viewport((0.0, 0.0), (25.0, 25.0));
        let lines = generate_rectangular_lines(Point2::origin(), 10.0, 10.0, &view);

        assert_eq!(lines.len(), 6);
        assert_eq!(vertical_positions(&lines), vec![0.0, 10.0, 20.0]);
        assert_eq!(horizontal_positions(&lines), vec![0.0, 10.0, 20.0]);

        for line in &lines[..3] {
            assert_eq!(line.start.y, 0.0);
            assert_eq!(line.end.y, 25.0);
        }
        for line in &lines[3..] {
            assert_eq!(line.start.x, 0.0);
            assert_eq!(line.end.x, 25.0);
        }
    }

    #[test]
    fn test_offset_origin_skips_lines_before_viewport() {
        let view = viewport((0.0, 0.0), (30.0, 30.0));
        let lines = generate_rectangular_lines(Point2::new(3.0, -4.0), 10.0, 15.0, &view);

        assert_eq!(vertical_positions(&lines), vec![3.0, 13.0, 23.0]);
        assert_eq!(horizontal_positions(&lines), vec![11.0, 26.0]);
        assert!(lines.iter().all(|line| line.is_within(&view)));
    }

    #[test]
    fn test_origin_far_outside_viewport() {
        let view = viewport((1000.0, -2000.0), (1020.0, -1990.0));
        let lines = generate_rectangular_lines(Point2::new(-5.0, 5.0), 10.0, 10.0, &view);
        assert_eq!(vertical_positions(&lines), vec![1005.0, 1015.0]);
        assert_eq!(horizontal_positions(&lines), vec![-1995.0]);
    }

    #[test]
    fn test_invalid_spacing_omits_axis() {
        let view = viewport((0.0, 0.0), (25.0, 25.0));

        let lines = generate_rectangular_lines(Point2::origin(), 0.0, 10.0, &view);
        assert!(vertical_positions(&lines).is_empty());
        assert_eq!(horizontal_positions(&lines).len(), 3);

        let lines = generate_rectangular_lines(Point2::origin(), 10.0, -1.0, &view);
        assert_eq!(lines.len(), 3);

        assert!(generate_rectangular_lines(Point2::origin(), f64::NAN, f64::INFINITY, &view).is_empty());
    }

    #[test]
    fn test_invalid_viewport_or_origin() {
        let inverted = viewport((10.0, 10.0), (0.0, 0.0));
        assert!(generate_rectangular_lines(Point2::origin(), 1.0, 1.0, &inverted).is_empty());

        let view = viewport((0.0, 0.0), (10.0, 10.0));
        assert!(generate_rectangular_lines(Point2::new(f64::NAN, 0.0), 1.0, 1.0, &view).is_empty());
    }

    #[test]
    fn test_too_dense_axis_is_skipped() {
        let view = viewport((0.0, 0.0), (1000.0, 10.0));
        let lines = generate_rectangular_lines(Point2::origin(), 0.001, 5.0, &view);
        assert!(vertical_positions(&lines).is_empty());
        assert_eq!(horizontal_positions(&lines), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_nearest_intersection() {
        let grid = RectangularGrid::new(10.0, 10.0);
        assert_eq!(grid.nearest_intersection(Point2::origin(), Point2::new(13.0, 13.0)), Some(Point2::new(10.0, 10.0)));
        assert_eq!(
            grid.nearest_intersection(Point2::new(2.0, 2.0), Point2::new(-4.0, 9.0)),
            Some(Point2::new(-8.0, 12.0))
        );

        let broken = RectangularGrid::new(10.0, 0.0);
        assert_eq!(broken.nearest_intersection(Point2::origin(), Point2::new(13.0, 13.0)), None);
    }

    #[test]
    fn test_snap_lines_bracket_point() {
        let grid = RectangularGrid::new(10.0, 5.0);
        let lines = grid.snap_lines(Point2::origin(), Point2::new(13.0, 10.0));

        // Two vertical lines around x = 13, one horizontal line through y = 10
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], SnapLine::new(Point2::new(10.0, 0.0), Vector2::y()));
        assert_eq!(lines[1], SnapLine::new(Point2::new(20.0, 0.0), Vector2::y()));
        assert_eq!(lines[2], SnapLine::new(Point2::new(0.0, 10.0), Vector2::x()));
    }

    #[test]
    fn test_intersections() {
        let grid = RectangularGrid::new(10.0, 10.0);
        let view = viewport((0.0, 0.0), (25.0, 15.0));
        let dots = grid.intersections(Point2::origin(), &view);
        assert_eq!(dots.len(), 6);
        assert!(dots.contains(&Point2::new(20.0, 10.0)));
        assert!(dots.iter().all(|dot| view.contains(dot)));

        let dense = RectangularGrid::new(0.1, 0.1);
        assert!(dense.intersections(Point2::origin(), &viewport((0.0, 0.0), (100.0, 100.0))).is_empty());
    }
}
