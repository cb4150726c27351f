//! Document-space alignment grids for GridForge.
//!
//! Resolves where grid instances are anchored (the global origin or the
//! selected artboards), generates clipped line geometry for rectangular and
//! isometric grids, and answers "nearest grid point" snapping queries.
//! Everything here is a pure function of its inputs: artboards, selection,
//! viewport and [`GridSpec`] are snapshots supplied per call.
//!
//! ```
//! use gridforge_core::{best_snap, render_overlay, GridSpec, ViewportBounds};
//! use nalgebra::Point2;
//!
//! let spec = GridSpec::rectangular(10.0, 10.0);
//! let viewport = ViewportBounds::new(Point2::new(0.0, 0.0), Point2::new(25.0, 25.0));
//!
//! let lines = render_overlay(&spec, &[], &viewport);
//! assert_eq!(lines.len(), 6);
//!
//! let snap = best_snap(Point2::new(13.0, 13.0), &spec, &[], 5.0).unwrap();
//! assert_eq!(snap.point, Point2::new(10.0, 10.0));
//! ```

pub mod artboard;
pub mod error;
pub mod geometry;
pub mod lines;
pub mod origin;
pub mod overlay;
pub mod settings;
pub mod snap;

pub use artboard::{artboard_at, selected_artboard_origins, Artboard, ArtboardId};
pub use error::{GridError, Result};
pub use geometry::{clip_line, GridLine, Origin, Rect, ViewportBounds};
pub use lines::{
    generate_isometric_lines, generate_lines, generate_rectangular_lines, GridGenerator, SnapLine,
    MAX_GRID_DOTS, MAX_LINES_PER_FAMILY, MAX_SEARCH_COLUMNS,
};
pub use origin::{optimize_origins, origin_epsilon_for_zoom, resolve_origins, resolved_origins, DEFAULT_ORIGIN_EPSILON};
pub use overlay::{render_dots, render_dots_with_epsilon, render_overlay, render_overlay_with_epsilon};
pub use settings::{GridKind, GridOriginMode, GridSpec, IsometricGrid, RectangularGrid};
pub use snap::{
    best_snap, best_snap_with_epsilon, constrained_snap, snap_candidates, snap_candidates_with_epsilon,
    snap_to_lines, snap_tolerance, LineSnap, SnapCandidate, SnapConstraint,
};
