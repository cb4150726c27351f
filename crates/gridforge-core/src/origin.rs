//! Resolution of the set of points grid instances are anchored to.
//!
//! Both the overlay renderer and the snapper go through [`resolved_origins`],
//! so what is drawn is exactly what can be snapped to.

use crate::geometry::{is_finite_point, Origin};
use crate::settings::{GridOriginMode, GridSpec};

/// Origins closer than this (document units) are treated as coincident.
pub const DEFAULT_ORIGIN_EPSILON: f64 = 0.01;

/// Ordered anchor points for one grid configuration.
///
/// Global mode always yields `[global_origin]`. Artboard mode yields the
/// selected artboard origins in selection order, or `[global_origin]` when
/// the selection is empty. Non-finite artboard origins are dropped first.
/// The result is never empty. No deduplication happens here, see
/// [`optimize_origins`].
pub fn resolve_origins(
    mode: GridOriginMode,
    global_origin: Origin,
    selected_artboard_origins: &[Origin],
) -> Vec<Origin> {
    match mode {
        GridOriginMode::Global => vec![global_origin],
        GridOriginMode::Artboard => {
            let origins: Vec<Origin> = selected_artboard_origins.iter().copied().filter(is_finite_point).collect();
            if origins.len() != selected_artboard_origins.len() {
                log::debug!(
                    "Dropped {} non-finite artboard origin(s)",
                    selected_artboard_origins.len() - origins.len()
                );
            }
            if origins.is_empty() {
                log::trace!("No artboard origin available, falling back to global origin");
                vec![global_origin]
            } else {
                origins
            }
        }
    }
}

/// Drop every origin lying closer than `epsilon` to an origin kept before
/// it. First occurrences win and the survivors keep their relative order.
pub fn optimize_origins(origins: &[Origin], epsilon: f64) -> Vec<Origin> {
    let mut kept: Vec<Origin> = Vec::with_capacity(origins.len());
    for origin in origins {
        if kept.iter().all(|existing| nalgebra::distance(existing, origin) >= epsilon) {
            kept.push(*origin);
        }
    }
    kept
}

/// The shared origin pipeline: [`resolve_origins`] then [`optimize_origins`].
pub fn resolved_origins(spec: &GridSpec, selected_artboard_origins: &[Origin], epsilon: f64) -> Vec<Origin> {
    let origins = resolve_origins(spec.origin_mode, spec.global_origin, selected_artboard_origins);
    optimize_origins(&origins, epsilon)
}

/// Deduplication threshold for a pixel distance at the given zoom.
pub fn origin_epsilon_for_zoom(screen_epsilon: f64, zoom: f64) -> f64 {
    let epsilon = screen_epsilon / zoom;
    if epsilon.is_finite() && epsilon >= 0.0 {
        epsilon
    } else {
        DEFAULT_ORIGIN_EPSILON
    }
}
