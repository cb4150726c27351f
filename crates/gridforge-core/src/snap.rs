//! Grid snapping queries, evaluated on every pointer move during a drag.
//!
//! Snapping resolves origins through the same pipeline as the overlay, so a
//! user can only ever snap to a grid that is drawn.

use nalgebra::{Point2, Vector2};

use crate::geometry::{is_finite_point, Origin};
use crate::origin::{resolved_origins, DEFAULT_ORIGIN_EPSILON};
use crate::settings::GridSpec;

/// A grid intersection offered as alignment target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    pub point: Point2<f64>,
    /// Euclidean distance from the query point.
    pub distance: f64,
    /// Origin of the grid instance this intersection belongs to.
    pub source_origin: Origin,
}

/// The closest point on one grid line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSnap {
    pub point: Point2<f64>,
    pub direction: Vector2<f64>,
    pub distance: f64,
    pub source_origin: Origin,
}

/// A line a drag is locked to, e.g. an axis constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConstraint {
    pub origin: Point2<f64>,
    pub direction: Vector2<f64>,
}

impl SnapConstraint {
    pub fn new(origin: Point2<f64>, direction: Vector2<f64>) -> Self {
        Self { origin, direction }
    }

    pub fn horizontal(origin: Point2<f64>) -> Self {
        Self::new(origin, Vector2::x())
    }

    pub fn vertical(origin: Point2<f64>) -> Self {
        Self::new(origin, Vector2::y())
    }
}

/// Convert a tolerance in screen pixels into document units.
pub fn snap_tolerance(screen_tolerance: f64, zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 {
        screen_tolerance / zoom
    } else {
        0.0
    }
}

/// The nearest intersection of every resolved grid instance, in origin
/// order, keeping only those within `tolerance` of `point`. At most one
/// candidate per origin: an origin whose nearest intersection lies outside
/// `tolerance` contributes no candidate, so the result can be shorter than
/// the resolved origin list.
pub fn snap_candidates(
    point: Point2<f64>,
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    tolerance: f64,
) -> Vec<SnapCandidate> {
    snap_candidates_with_epsilon(point, spec, selected_artboard_origins, tolerance, DEFAULT_ORIGIN_EPSILON)
}

pub fn snap_candidates_with_epsilon(
    point: Point2<f64>,
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    tolerance: f64,
    epsilon: f64,
) -> Vec<SnapCandidate> {
    if !is_finite_point(&point) {
        return Vec::new();
    }
    let generator = spec.grid_kind.generator();
    resolved_origins(spec, selected_artboard_origins, epsilon)
        .into_iter()
        .filter_map(|source_origin| {
            let snapped = generator.nearest_intersection(source_origin, point)?;
            let distance = nalgebra::distance(&snapped, &point);
            (distance.is_finite() && distance <= tolerance).then_some(SnapCandidate {
                point: snapped,
                distance,
                source_origin,
            })
        })
        .collect()
}

/// The closest candidate within `tolerance`. Equally close candidates
/// resolve to the one from the earliest resolved origin.
pub fn best_snap(
    point: Point2<f64>,
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    tolerance: f64,
) -> Option<SnapCandidate> {
    best_snap_with_epsilon(point, spec, selected_artboard_origins, tolerance, DEFAULT_ORIGIN_EPSILON)
}

pub fn best_snap_with_epsilon(
    point: Point2<f64>,
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    tolerance: f64,
    epsilon: f64,
) -> Option<SnapCandidate> {
    let best = closest(
        snap_candidates_with_epsilon(point, spec, selected_artboard_origins, tolerance, epsilon),
        |candidate| candidate.distance,
    );
    log::trace!("Grid snap at ({:.3}, {:.3}): {:?}", point.x, point.y, best);
    best
}

/// Projections of `point` onto the grid lines around it, in origin order,
/// keeping those within `tolerance`.
pub fn snap_to_lines(
    point: Point2<f64>,
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    tolerance: f64,
) -> Vec<LineSnap> {
    if !is_finite_point(&point) {
        return Vec::new();
    }
    let generator = spec.grid_kind.generator();
    let mut snaps = Vec::new();
    for source_origin in resolved_origins(spec, selected_artboard_origins, DEFAULT_ORIGIN_EPSILON) {
        for line in generator.snap_lines(source_origin, point) {
            let projected = line.project(point);
            let distance = nalgebra::distance(&projected, &point);
            if !distance.is_finite() || distance > tolerance {
                continue;
            }
            snaps.push(LineSnap {
                point: projected,
                direction: line.direction,
                distance,
                source_origin,
            });
        }
    }
    snaps
}

/// Snap while the drag is locked to `constraint`: the constraint line is
/// intersected with the grid lines around the constrained position and the
/// closest intersection strictly within `tolerance` wins.
pub fn constrained_snap(
    point: Point2<f64>,
    constraint: SnapConstraint,
    spec: &GridSpec,
    selected_artboard_origins: &[Origin],
    tolerance: f64,
) -> Option<SnapCandidate> {
    let direction = constraint.direction.try_normalize(f64::EPSILON)?;
    if !is_finite_point(&point) || !is_finite_point(&constraint.origin) {
        return None;
    }
    let constrained = constraint.origin + direction * (point - constraint.origin).dot(&direction);

    let generator = spec.grid_kind.generator();
    let mut candidates = Vec::new();
    for source_origin in resolved_origins(spec, selected_artboard_origins, DEFAULT_ORIGIN_EPSILON) {
        for line in generator.snap_lines(source_origin, constrained) {
            let Some(intersection) = line.intersect(constraint.origin, direction) else {
                continue;
            };
            let distance = nalgebra::distance(&intersection, &point);
            if distance < tolerance {
                candidates.push(SnapCandidate {
                    point: intersection,
                    distance,
                    source_origin,
                });
            }
        }
    }
    closest(candidates, |candidate| candidate.distance)
}

/// Minimum by `distance`, first one wins on ties.
fn closest<T>(items: impl IntoIterator<Item = T>, distance: impl Fn(&T) -> f64) -> Option<T> {
    let mut best: Option<T> = None;
    for item in items {
        if best.as_ref().is_none_or(|current| distance(&item) < distance(current)) {
            best = Some(item);
        }
    }
    best
}
