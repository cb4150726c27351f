use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::geometry::{positive_spacing, Origin};

/// Upper bound on how many times a spacing is doubled for one zoom level.
const MAX_SPACING_DOUBLINGS: u32 = 64;

/// Where grid instances are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridOriginMode {
    /// Always the configured global origin.
    #[default]
    Global,
    /// The top-left corner of every selected artboard, or the global origin
    /// when nothing is selected.
    Artboard,
}

impl GridOriginMode {
    pub fn toggled(self) -> Self {
        match self {
            GridOriginMode::Global => GridOriginMode::Artboard,
            GridOriginMode::Artboard => GridOriginMode::Global,
        }
    }
}

/// Axis-aligned grid with independent horizontal and vertical spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularGrid {
    pub spacing: Vector2<f64>,
}

impl RectangularGrid {
    pub fn new(spacing_x: f64, spacing_y: f64) -> Self {
        Self {
            spacing: Vector2::new(spacing_x, spacing_y),
        }
    }
}

/// Three-family grid: one vertical family plus two families at `angle_a`
/// and `angle_b` degrees from the horizontal, sloping in opposite
/// directions. Angled lines are `y_axis_spacing` apart along any vertical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsometricGrid {
    pub y_axis_spacing: f64,
    pub angle_a: f64,
    pub angle_b: f64,
    /// Distance between vertical lines. `None` puts them through the
    /// crossings of the two angled families.
    #[serde(default)]
    pub vertical_spacing: Option<f64>,
}

impl IsometricGrid {
    pub fn new(y_axis_spacing: f64, angle_a: f64, angle_b: f64) -> Self {
        Self {
            y_axis_spacing,
            angle_a,
            angle_b,
            vertical_spacing: None,
        }
    }

    /// Both angled families mirrored about the vertical.
    pub fn symmetric(y_axis_spacing: f64, angle_degrees: f64) -> Self {
        Self::new(y_axis_spacing, angle_degrees, angle_degrees)
    }

    /// Every family `spacing` apart, measured perpendicular to its lines.
    /// At 30 degrees the three families still meet at common points.
    pub fn from_perpendicular_spacing(spacing: f64, angle_degrees: f64) -> Self {
        let y_axis_spacing = spacing / angle_degrees.to_radians().cos().abs();
        Self {
            vertical_spacing: Some(spacing),
            ..Self::symmetric(y_axis_spacing, angle_degrees)
        }
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            y_axis_spacing: self.y_axis_spacing * factor,
            vertical_spacing: self.vertical_spacing.map(|spacing| spacing * factor),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GridKind {
    Rectangular(RectangularGrid),
    Isometric(IsometricGrid),
}

impl GridKind {
    pub fn rectangular() -> Self {
        GridKind::Rectangular(RectangularGrid::new(10.0, 10.0))
    }

    pub fn isometric() -> Self {
        GridKind::Isometric(IsometricGrid::from_perpendicular_spacing(10.0, 30.0))
    }

    pub fn is_rectangular(&self) -> bool {
        matches!(self, GridKind::Rectangular(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            GridKind::Rectangular(_) => "Rectangular",
            GridKind::Isometric(_) => "Isometric",
        }
    }
}

impl Default for GridKind {
    fn default() -> Self {
        GridKind::rectangular()
    }
}

/// Grid configuration as owned by document settings. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default)]
    pub origin_mode: GridOriginMode,
    pub global_origin: Origin,
    pub grid_kind: GridKind,
    /// Show intersections as dots instead of full lines.
    #[serde(default)]
    pub dots: bool,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            origin_mode: GridOriginMode::Global,
            global_origin: Point2::origin(),
            grid_kind: GridKind::default(),
            dots: false,
        }
    }
}

impl GridSpec {
    pub fn rectangular(spacing_x: f64, spacing_y: f64) -> Self {
        Self {
            grid_kind: GridKind::Rectangular(RectangularGrid::new(spacing_x, spacing_y)),
            ..Default::default()
        }
    }

    /// Isometric grid with every line family `spacing` apart.
    pub fn isometric(spacing: f64, angle_degrees: f64) -> Self {
        Self {
            grid_kind: GridKind::Isometric(IsometricGrid::from_perpendicular_spacing(spacing, angle_degrees)),
            ..Default::default()
        }
    }

    pub fn with_origin_mode(mut self, origin_mode: GridOriginMode) -> Self {
        self.origin_mode = origin_mode;
        self
    }

    pub fn with_global_origin(mut self, global_origin: Origin) -> Self {
        self.global_origin = global_origin;
        self
    }

    pub fn with_dots(mut self, dots: bool) -> Self {
        self.dots = dots;
        self
    }

    /// Coarsen the grid for the current zoom: every valid spacing is doubled
    /// until it spans at least `min_screen_spacing` pixels on screen.
    /// Invalid spacings, zoom or minimum leave the grid untouched, so the
    /// generators still see (and reject) the configured values.
    pub fn adapted_to_zoom(&self, zoom: f64, min_screen_spacing: f64) -> GridSpec {
        if !(zoom.is_finite() && zoom > 0.0 && min_screen_spacing.is_finite() && min_screen_spacing > 0.0) {
            return self.clone();
        }

        let grid_kind = match self.grid_kind {
            GridKind::Rectangular(grid) => GridKind::Rectangular(RectangularGrid::new(
                coarsen(grid.spacing.x, zoom, min_screen_spacing),
                coarsen(grid.spacing.y, zoom, min_screen_spacing),
            )),
            GridKind::Isometric(grid) => match grid.finest_spacing() {
                Some(finest) => GridKind::Isometric(grid.scaled(coarsen(finest, zoom, min_screen_spacing) / finest)),
                None => GridKind::Isometric(grid),
            },
        };

        GridSpec {
            grid_kind,
            ..self.clone()
        }
    }
}

fn coarsen(spacing: f64, zoom: f64, min_screen_spacing: f64) -> f64 {
    let Some(mut spacing) = positive_spacing(spacing) else {
        return spacing;
    };
    for _ in 0..MAX_SPACING_DOUBLINGS {
        if spacing * zoom >= min_screen_spacing {
            break;
        }
        spacing *= 2.0;
    }
    spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec() {
        let spec = GridSpec::default();
        assert_eq!(spec.origin_mode, GridOriginMode::Global);
        assert_eq!(spec.global_origin, Point2::new(0.0, 0.0));
        assert!(spec.grid_kind.is_rectangular());
        assert!(!spec.dots);
    }

    #[test]
    fn test_toggle_origin_mode() {
        assert_eq!(GridOriginMode::Global.toggled(), GridOriginMode::Artboard);
        assert_eq!(GridOriginMode::Artboard.toggled(), GridOriginMode::Global);
    }

    #[test]
    fn test_rectangular_zoom_adaptation() {
        let spec = GridSpec::rectangular(10.0, 4.0);

        // At 100% a 10 unit grid is 10 px: coarsened to reach 16 px
        let adapted = spec.adapted_to_zoom(1.0, 16.0);
        assert_eq!(adapted.grid_kind, GridKind::Rectangular(RectangularGrid::new(20.0, 16.0)));

        // Zoomed in far enough, nothing changes
        let adapted = spec.adapted_to_zoom(8.0, 16.0);
        assert_eq!(adapted, spec);
    }

    #[test]
    fn test_zoom_adaptation_keeps_invalid_values() {
        let spec = GridSpec::rectangular(-5.0, f64::NAN);
        let adapted = spec.adapted_to_zoom(0.5, 16.0);
        match adapted.grid_kind {
            GridKind::Rectangular(grid) => {
                assert_eq!(grid.spacing.x, -5.0);
                assert!(grid.spacing.y.is_nan());
            }
            GridKind::Isometric(_) => panic!("grid kind changed"),
        }

        let spec = GridSpec::rectangular(10.0, 10.0);
        assert_eq!(spec.adapted_to_zoom(0.0, 16.0), spec);
        assert_eq!(spec.adapted_to_zoom(f64::INFINITY, 16.0), spec);
    }

    #[test]
    fn test_isometric_zoom_adaptation() {
        let spec = GridSpec::isometric(10.0, 30.0);
        let adapted = spec.adapted_to_zoom(1.0, 16.0);
        let GridKind::Isometric(grid) = adapted.grid_kind else {
            panic!("grid kind changed");
        };
        // Every family is 10 apart, one doubling reaches 16 px
        assert_eq!(grid.vertical_spacing, Some(20.0));
        assert!((grid.y_axis_spacing - 40.0 / 3f64.sqrt()).abs() < 1e-9);
        assert_eq!(grid.angle_a, 30.0);
        assert_eq!(grid.angle_b, 30.0);

        // Without explicit vertical spacing the finest family at 30° is 8.66 apart
        let lattice = GridSpec {
            grid_kind: GridKind::Isometric(IsometricGrid::symmetric(10.0, 30.0)),
            ..GridSpec::default()
        };
        let GridKind::Isometric(grid) = lattice.adapted_to_zoom(1.0, 16.0).grid_kind else {
            panic!("grid kind changed");
        };
        assert!((grid.y_axis_spacing - 20.0).abs() < 1e-9);
        assert_eq!(grid.vertical_spacing, None);
    }

    #[test]
    fn test_perpendicular_spacing() {
        let grid = IsometricGrid::from_perpendicular_spacing(10.0, 60.0);
        assert!((grid.y_axis_spacing - 20.0).abs() < 1e-9);
        assert_eq!(grid.vertical_spacing, Some(10.0));
        assert_eq!((grid.angle_a, grid.angle_b), (60.0, 60.0));

        assert!(IsometricGrid::from_perpendicular_spacing(10.0, f64::NAN).y_axis_spacing.is_nan());
    }

    #[test]
    fn test_spec_serde() {
        let spec = GridSpec::isometric(12.0, 30.0)
            .with_origin_mode(GridOriginMode::Artboard)
            .with_global_origin(Point2::new(3.0, 4.0));
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: GridSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }
}
