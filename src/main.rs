use std::path::PathBuf;

use egui::ViewportBuilder;

mod app;
mod config;
mod view;

use app::GridForgeApp;
use config::ViewerConfig;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_module("eframe", log::LevelFilter::Warn)
        .init();

    let config = ViewerConfig::load(std::env::args_os().nth(1).map(PathBuf::from));
    let window_size = config.window_size;

    eframe::run_native(
        "GridForge - Alignment Grid Viewer",
        eframe::NativeOptions {
            viewport: ViewportBuilder::default().with_inner_size(window_size),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(GridForgeApp::new(config)))),
    )
}
