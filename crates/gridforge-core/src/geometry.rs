use std::ops::RangeInclusive;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Anchor point of one grid instance, in document space.
pub type Origin = Point2<f64>;

/// Visible document-space region a frame or query is computed for.
pub type ViewportBounds = Rect;

/// Slack applied when turning a coordinate range into lattice indices, so a
/// line that sits exactly on a viewport edge survives float noise.
const STEP_EPSILON: f64 = 1e-9;

/// Cross products below this are treated as parallel lines.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Axis-aligned rectangle in document space (y grows downwards, so `min` is
/// the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Build a rectangle from any two opposite corners.
    pub fn from_corners(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_origin_size(origin: Point2<f64>, size: Vector2<f64>) -> Self {
        Self::from_corners(origin, origin + size)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Finite on every coordinate and not inverted on either axis.
    pub fn is_valid(&self) -> bool {
        is_finite_point(&self.min) && is_finite_point(&self.max) && self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }

    pub fn clamp(&self, point: Point2<f64>) -> Point2<f64> {
        Point2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

/// A finite segment of one grid line, already clipped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl GridLine {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }

    pub fn is_within(&self, bounds: &Rect) -> bool {
        bounds.contains(&self.start) && bounds.contains(&self.end)
    }
}

pub fn is_finite_point(point: &Point2<f64>) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Spacing values only produce geometry when strictly positive and finite.
pub fn positive_spacing(spacing: f64) -> Option<f64> {
    (spacing.is_finite() && spacing > 0.0).then_some(spacing)
}

/// Orthogonal projection of `point` onto the infinite line through
/// `line_point` along `direction`.
pub fn project_onto_line(point: Point2<f64>, line_point: Point2<f64>, direction: Vector2<f64>) -> Point2<f64> {
    let length_squared = direction.norm_squared();
    if length_squared == 0.0 {
        return line_point;
    }
    line_point + direction * ((point - line_point).dot(&direction) / length_squared)
}

/// Intersection of two infinite lines, `None` when they are parallel.
pub fn intersect_lines(
    point_a: Point2<f64>,
    direction_a: Vector2<f64>,
    point_b: Point2<f64>,
    direction_b: Vector2<f64>,
) -> Option<Point2<f64>> {
    let cross = direction_a.perp(&direction_b);
    if cross.abs() < PARALLEL_EPSILON || !cross.is_finite() {
        return None;
    }
    let t = (point_b - point_a).perp(&direction_b) / cross;
    let intersection = point_a + direction_a * t;
    is_finite_point(&intersection).then_some(intersection)
}

/// Clip the infinite line through `point` along `direction` to `bounds`
/// (Liang–Barsky). Endpoints are clamped so they never leave the rectangle.
pub fn clip_line(point: Point2<f64>, direction: Vector2<f64>, bounds: &Rect) -> Option<GridLine> {
    if !bounds.is_valid() || !is_finite_point(&point) || !direction.x.is_finite() || !direction.y.is_finite() {
        return None;
    }
    if direction.norm_squared() == 0.0 {
        return None;
    }

    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    for axis in 0..2 {
        let (start, step) = (point[axis], direction[axis]);
        let (low, high) = (bounds.min[axis], bounds.max[axis]);
        if step == 0.0 {
            if start < low || start > high {
                return None;
            }
            continue;
        }
        let t_low = (low - start) / step;
        let t_high = (high - start) / step;
        t_enter = t_enter.max(t_low.min(t_high));
        t_exit = t_exit.min(t_low.max(t_high));
    }

    if t_enter > t_exit || !t_enter.is_finite() || !t_exit.is_finite() {
        return None;
    }

    Some(GridLine::new(
        bounds.clamp(point + direction * t_enter),
        bounds.clamp(point + direction * t_exit),
    ))
}

/// Result of enumerating the lattice positions `offset + k * spacing` that
/// fall inside `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Steps {
    Empty,
    /// More positions than the caller's cap; carries the would-be count.
    TooDense(f64),
    Range(RangeInclusive<i64>),
}

pub(crate) fn steps_within(min: f64, max: f64, offset: f64, spacing: f64, cap: usize) -> Steps {
    let first = ((min - offset) / spacing - STEP_EPSILON).ceil();
    let last = ((max - offset) / spacing + STEP_EPSILON).floor();
    if !first.is_finite() || !last.is_finite() || last < first {
        return Steps::Empty;
    }
    let count = last - first + 1.0;
    if count > cap as f64 {
        return Steps::TooDense(count);
    }
    Steps::Range(first as i64..=last as i64)
}

/// Grid position `offset + index * spacing` nearest to `value`.
pub(crate) fn nearest_step(value: f64, offset: f64, spacing: f64) -> f64 {
    ((value - offset) / spacing).round() * spacing + offset
}

/// The grid positions immediately at or below and at or above `value`.
/// Collapses to a single position when `value` sits on the grid.
pub(crate) fn bracketing_steps(value: f64, offset: f64, spacing: f64) -> Vec<f64> {
    let ratio = (value - offset) / spacing;
    let below = ratio.floor() * spacing + offset;
    let above = ratio.ceil() * spacing + offset;
    if below == above { vec![below] } else { vec![below, above] }
}
