use egui::{Pos2, Vec2};
use gridforge_core::ViewportBounds;
use nalgebra::{Point2, Vector2};

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 100.0;

/// Document to screen mapping: `screen = doc * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan: Vector2<f64>,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Vector2::new(40.0, 40.0),
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn to_screen(&self, doc: Point2<f64>) -> Pos2 {
        let screen = doc * self.zoom + self.pan;
        Pos2::new(screen.x as f32, screen.y as f32)
    }

    pub fn to_document(&self, screen: Pos2) -> Point2<f64> {
        let screen = Point2::new(screen.x as f64, screen.y as f64);
        Point2::from((screen - self.pan).coords / self.zoom)
    }

    /// The part of the document shown inside `rect` on screen.
    pub fn visible_bounds(&self, rect: egui::Rect) -> ViewportBounds {
        ViewportBounds::from_corners(self.to_document(rect.min), self.to_document(rect.max))
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += Vector2::new(delta.x as f64, delta.y as f64);
    }

    /// Zoom by `factor` keeping the document point under `anchor` in place.
    pub fn zoom_about(&mut self, anchor: Pos2, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.to_document(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = Vector2::new(anchor.x as f64, anchor.y as f64) - fixed.coords * self.zoom;
    }
}
