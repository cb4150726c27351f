use egui::{Color32, FontId, Key, PointerButton, Pos2, Sense, Stroke, StrokeKind};
use gridforge_core::{
    artboard_at, best_snap_with_epsilon, origin_epsilon_for_zoom, render_dots_with_epsilon,
    render_overlay_with_epsilon, selected_artboard_origins, snap_tolerance, Artboard, ArtboardId, GridKind,
    GridOriginMode, GridSpec, Origin, SnapCandidate,
};
use nalgebra::{Point2, Vector2};

use crate::config::ViewerConfig;
use crate::view::ViewTransform;

const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 34);
const ARTBOARD_FILL: Color32 = Color32::from_rgb(245, 245, 245);
const ARTBOARD_OUTLINE: Color32 = Color32::from_rgb(90, 90, 90);
const SELECTION_OUTLINE: Color32 = Color32::from_rgb(0, 150, 255);
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 120, 200, 90);
const SNAP_COLOR: Color32 = Color32::from_rgb(255, 120, 0);

/// Scroll distance, in points, that zooms by a factor of e.
const SCROLL_ZOOM_SCALE: f64 = 500.0;

pub struct GridForgeApp {
    config: ViewerConfig,
    artboards: Vec<Artboard>,
    selection: Vec<ArtboardId>,
    spec: GridSpec,
    /// The grid kind `G` switches to, keeping its parameters across toggles.
    other_kind: GridKind,
    view: ViewTransform,
    last_snap: Option<SnapCandidate>,
}

impl GridForgeApp {
    pub fn new(config: ViewerConfig) -> Self {
        let spec = config.grid.clone();
        let other_kind = if spec.grid_kind.is_rectangular() {
            GridKind::isometric()
        } else {
            GridKind::rectangular()
        };
        Self {
            config,
            artboards: demo_artboards(),
            selection: Vec::new(),
            spec,
            other_kind,
            view: ViewTransform::default(),
            last_snap: None,
        }
    }

    pub fn toggle_grid_kind(&mut self) {
        std::mem::swap(&mut self.spec.grid_kind, &mut self.other_kind);
        log::info!("Grid type set to {}", self.spec.grid_kind.name());
    }

    pub fn toggle_origin_mode(&mut self) {
        self.spec.origin_mode = self.spec.origin_mode.toggled();
        log::info!("Grid origin mode set to {:?}", self.spec.origin_mode);
    }

    pub fn toggle_dots(&mut self) {
        self.spec.dots = !self.spec.dots;
        log::info!("Grid display set to {}", if self.spec.dots { "dots" } else { "lines" });
    }

    /// Click handling: pick the topmost artboard under `point`, replacing the
    /// selection or, with `extend`, toggling it in the selection. Clicking
    /// empty space without `extend` clears the selection.
    pub fn select_at(&mut self, point: Point2<f64>, extend: bool) {
        let hit = artboard_at(&self.artboards, &point);
        match (hit, extend) {
            (Some(id), true) => {
                if let Some(index) = self.selection.iter().position(|selected| *selected == id) {
                    self.selection.remove(index);
                } else {
                    self.selection.push(id);
                }
            }
            (Some(id), false) => self.selection = vec![id],
            (None, true) => return,
            (None, false) => self.selection.clear(),
        }
        log::info!("Selected artboards: {:?}", self.selection);
    }

    fn selected_origins(&self) -> Vec<Origin> {
        match selected_artboard_origins(&self.artboards, &self.selection) {
            Ok(origins) => origins,
            Err(err) => {
                log::warn!("Ignoring artboard selection: {}", err);
                Vec::new()
            }
        }
    }

    fn handle_hotkeys(&mut self, ctx: &egui::Context) {
        let (grid, origin, dots) =
            ctx.input(|i| (i.key_pressed(Key::G), i.key_pressed(Key::O), i.key_pressed(Key::D)));
        if grid {
            self.toggle_grid_kind();
        }
        if origin {
            self.toggle_origin_mode();
        }
        if dots {
            self.toggle_dots();
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} grid", self.spec.grid_kind.name()));
                ui.separator();
                ui.label(format!("Origin: {:?}", self.spec.origin_mode));
                ui.separator();
                ui.label(format!("Zoom: {:.0}%", self.view.zoom * 100.0));
                ui.separator();
                match self.last_snap {
                    Some(snap) => ui.label(format!("Snap: ({:.2}, {:.2})", snap.point.x, snap.point.y)),
                    None => ui.label("Snap: -"),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak("G grid type  O origin mode  D dots");
                });
            });
        });
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());

        if response.dragged_by(PointerButton::Secondary) || response.dragged_by(PointerButton::Middle) {
            self.view.pan_by(response.drag_delta());
        }
        if let Some(pointer) = response.hover_pos() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.view.zoom_about(pointer, (scroll as f64 / SCROLL_ZOOM_SCALE).exp());
            }
        }
        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let extend = ui.input(|i| i.modifiers.shift);
                self.select_at(self.view.to_document(pointer), extend);
            }
        }

        painter.rect_filled(response.rect, 0.0, BACKGROUND);
        for artboard in &self.artboards {
            let rect = egui::Rect::from_two_pos(
                self.view.to_screen(artboard.bounds.min),
                self.view.to_screen(artboard.bounds.max),
            );
            painter.rect_filled(rect, 0.0, ARTBOARD_FILL);
            let outline = if self.selection.contains(&artboard.id) {
                Stroke::new(2.0, SELECTION_OUTLINE)
            } else {
                Stroke::new(1.0, ARTBOARD_OUTLINE)
            };
            painter.rect_stroke(rect, 0.0, outline, StrokeKind::Outside);
            painter.text(
                rect.left_top() - egui::vec2(0.0, 4.0),
                egui::Align2::LEFT_BOTTOM,
                &artboard.name,
                FontId::proportional(12.0),
                Color32::LIGHT_GRAY,
            );
        }

        let zoom = self.view.zoom;
        let spec = self.spec.adapted_to_zoom(zoom, self.config.min_grid_spacing_px);
        let origins = self.selected_origins();
        let epsilon = origin_epsilon_for_zoom(self.config.origin_epsilon_px, zoom);
        let viewport = self.view.visible_bounds(response.rect);

        if spec.dots {
            for dot in render_dots_with_epsilon(&spec, &origins, &viewport, epsilon) {
                painter.circle_filled(self.view.to_screen(dot), 1.5, GRID_COLOR);
            }
        } else {
            let stroke = Stroke::new(1.0, GRID_COLOR);
            for line in render_overlay_with_epsilon(&spec, &origins, &viewport, epsilon) {
                painter.line_segment([self.view.to_screen(line.start), self.view.to_screen(line.end)], stroke);
            }
        }

        self.last_snap = response.hover_pos().and_then(|pointer| {
            let tolerance = snap_tolerance(self.config.snap_tolerance_px, zoom);
            best_snap_with_epsilon(self.view.to_document(pointer), &spec, &origins, tolerance, epsilon)
        });
        if let Some(snap) = self.last_snap {
            let center = self.view.to_screen(snap.point);
            painter.circle_stroke(center, 5.0, Stroke::new(2.0, SNAP_COLOR));
            draw_origin_marker(&painter, self.view.to_screen(snap.source_origin));
        }
    }
}

fn draw_origin_marker(painter: &egui::Painter, center: Pos2) {
    let stroke = Stroke::new(1.5, SNAP_COLOR);
    painter.line_segment([center - egui::vec2(6.0, 0.0), center + egui::vec2(6.0, 0.0)], stroke);
    painter.line_segment([center - egui::vec2(0.0, 6.0), center + egui::vec2(0.0, 6.0)], stroke);
}

/// A small document: two side-by-side artboards plus two stacked at almost
/// the same position.
fn demo_artboards() -> Vec<Artboard> {
    let size = Vector2::new(320.0, 240.0);
    vec![
        Artboard::new(ArtboardId(1), "Artboard 1", Point2::new(0.0, 0.0), size),
        Artboard::new(ArtboardId(2), "Artboard 2", Point2::new(373.0, 17.0), size),
        Artboard::new(ArtboardId(3), "Artboard 3", Point2::new(45.0, 310.0), size),
        Artboard::new(ArtboardId(4), "Artboard 3 copy", Point2::new(45.005, 310.0), Vector2::new(200.0, 120.0)),
    ]
}

impl eframe::App for GridForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_hotkeys(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_canvas(ui));
    }
}
