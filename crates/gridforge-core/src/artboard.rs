use std::fmt;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geometry::{Origin, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtboardId(pub u64);

impl fmt::Display for ArtboardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of a canvas region in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artboard {
    pub id: ArtboardId,
    pub name: String,
    pub bounds: Rect,
}

impl Artboard {
    pub fn new(id: ArtboardId, name: impl Into<String>, top_left: Point2<f64>, size: Vector2<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            bounds: Rect::from_origin_size(top_left, size),
        }
    }

    /// The artboard's grid origin: its top-left corner.
    pub fn origin(&self) -> Origin {
        self.bounds.min
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.bounds.contains(point)
    }
}

/// Origins of the selected artboards, in selection order.
///
/// Fails on the first selected id that is missing from `artboards` or whose
/// bounds are not finite, so bad document state never reaches the grid.
pub fn selected_artboard_origins(artboards: &[Artboard], selection: &[ArtboardId]) -> Result<Vec<Origin>> {
    selection
        .iter()
        .map(|id| {
            let artboard = artboards
                .iter()
                .find(|artboard| artboard.id == *id)
                .ok_or(GridError::UnknownArtboard(*id))?;
            if !artboard.bounds.is_valid() {
                return Err(GridError::NonFiniteBounds(*id));
            }
            Ok(artboard.origin())
        })
        .collect()
}

/// Topmost artboard under `point`; later artboards are drawn above earlier ones.
pub fn artboard_at(artboards: &[Artboard], point: &Point2<f64>) -> Option<ArtboardId> {
    artboards.iter().rev().find(|artboard| artboard.contains(point)).map(|artboard| artboard.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Vec<Artboard> {
        vec![
            Artboard::new(ArtboardId(1), "Cover", Point2::new(0.0, 0.0), Vector2::new(100.0, 80.0)),
            Artboard::new(ArtboardId(2), "Back", Point2::new(150.0, 0.0), Vector2::new(100.0, 80.0)),
            Artboard::new(ArtboardId(3), "Flipped", Point2::new(40.0, 300.0), Vector2::new(-40.0, -20.0)),
        ]
    }

    #[test]
    fn test_origin_is_top_left() {
        let artboards = document();
        assert_eq!(artboards[0].origin(), Point2::new(0.0, 0.0));
        // Negative sizes are normalized
        assert_eq!(artboards[2].origin(), Point2::new(0.0, 280.0));
    }

    #[test]
    fn test_selected_origins_follow_selection_order() {
        let origins = selected_artboard_origins(&document(), &[ArtboardId(2), ArtboardId(1)]).unwrap();
        assert_eq!(origins, vec![Point2::new(150.0, 0.0), Point2::new(0.0, 0.0)]);
        assert!(selected_artboard_origins(&document(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_artboard_is_rejected() {
        let result = selected_artboard_origins(&document(), &[ArtboardId(1), ArtboardId(9)]);
        assert!(matches!(result, Err(GridError::UnknownArtboard(ArtboardId(9)))));
    }

    #[test]
    fn test_non_finite_bounds_are_rejected() {
        let mut artboards = document();
        artboards[1].bounds.max.x = f64::NAN;
        let result = selected_artboard_origins(&artboards, &[ArtboardId(2)]);
        assert!(matches!(result, Err(GridError::NonFiniteBounds(ArtboardId(2)))));
        assert_eq!(
            GridError::NonFiniteBounds(ArtboardId(2)).to_string(),
            "artboard #2 has a non-finite bounding rectangle"
        );
    }

    #[test]
    fn test_artboard_hit_testing() {
        let mut artboards = document();
        artboards.push(Artboard::new(ArtboardId(4), "Overlay", Point2::new(50.0, 50.0), Vector2::new(20.0, 20.0)));
        assert_eq!(artboard_at(&artboards, &Point2::new(60.0, 60.0)), Some(ArtboardId(4)));
        assert_eq!(artboard_at(&artboards, &Point2::new(10.0, 10.0)), Some(ArtboardId(1)));
        assert_eq!(artboard_at(&artboards, &Point2::new(120.0, 10.0)), None);
    }
}
