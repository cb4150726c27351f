//! Grid line generation, one strategy per grid topology.

mod isometric;
mod rectangular;

pub use isometric::generate_isometric_lines;
pub use rectangular::generate_rectangular_lines;

use nalgebra::{Point2, Vector2};

use crate::geometry::{intersect_lines, project_onto_line, GridLine, Origin, ViewportBounds};
use crate::settings::GridKind;

/// A single family emitting more lines than this for one origin is skipped.
pub const MAX_LINES_PER_FAMILY: usize = 4096;

/// Dot display gives up on an origin beyond this many intersections.
pub const MAX_GRID_DOTS: usize = 10_000;

/// Lattice columns visited by one isometric nearest-intersection query.
pub const MAX_SEARCH_COLUMNS: usize = 256;

/// An infinite grid line, used by snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapLine {
    pub point: Point2<f64>,
    pub direction: Vector2<f64>,
}

impl SnapLine {
    pub fn new(point: Point2<f64>, direction: Vector2<f64>) -> Self {
        Self { point, direction }
    }

    pub fn project(&self, point: Point2<f64>) -> Point2<f64> {
        project_onto_line(point, self.point, self.direction)
    }

    pub fn intersect(&self, point: Point2<f64>, direction: Vector2<f64>) -> Option<Point2<f64>> {
        intersect_lines(self.point, self.direction, point, direction)
    }
}

/// Shared contract of the rectangular and isometric topologies.
///
/// Every method degrades to an empty result on unusable parameters
/// (non-positive or non-finite spacing, non-finite angles, invalid viewport).
pub trait GridGenerator {
    /// All grid lines of the instance anchored at `origin` that cross
    /// `viewport`, clipped to it.
    fn generate_lines(&self, origin: Origin, viewport: &ViewportBounds) -> Vec<GridLine>;

    /// The grid intersection closest to `point`.
    fn nearest_intersection(&self, origin: Origin, point: Point2<f64>) -> Option<Point2<f64>>;

    /// For every line family, the grid lines at or immediately on either side
    /// of `point`.
    fn snap_lines(&self, origin: Origin, point: Point2<f64>) -> Vec<SnapLine>;

    /// Intersections inside `viewport`, for dot display.
    fn intersections(&self, origin: Origin, viewport: &ViewportBounds) -> Vec<Point2<f64>>;
}

impl GridKind {
    pub fn generator(&self) -> &dyn GridGenerator {
        match self {
            GridKind::Rectangular(grid) => grid,
            GridKind::Isometric(grid) => grid,
        }
    }
}

/// Lines for one origin, dispatched on the grid topology.
pub fn generate_lines(kind: &GridKind, origin: Origin, viewport: &ViewportBounds) -> Vec<GridLine> {
    kind.generator().generate_lines(origin, viewport)
}
