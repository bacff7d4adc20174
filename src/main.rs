//! Drag-and-drop form designer for widget-construction code.

mod app;
mod highlight;

use crate::app::DesignerApp;

use eframe::egui;
use rad_form_designer::DesignerSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SETTINGS_ENV: &str = "RAD_DESIGNER_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "rad-designer-settings.json";

fn initial_inner_size(settings: &DesignerSettings) -> egui::Vec2 {
    // Base: canvas
    let mut w = settings.canvas_size.width as f32;
    let mut h = settings.canvas_size.height as f32;

    // Right inspector (default width = 260)
    w += 260.0;

    // Left palette is open by default
    w += 220.0;

    // Menubar, console and side padding
    h += 140.0;
    w += 16.0;

    egui::vec2(w, h)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings_path = std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = DesignerSettings::load_or_default(&settings_path);
    tracing::info!(path = %settings_path.display(), "designer settings loaded");

    let mut native_options = eframe::NativeOptions::default();
    let size = initial_inner_size(&settings);

    native_options.viewport = egui::ViewportBuilder::default()
        .with_inner_size(size)
        .with_min_inner_size(egui::vec2(640.0, 480.0))
        .with_resizable(true);

    eframe::run_native(
        "RAD Form Designer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(DesignerApp::new(settings, settings_path)))),
    )
}
