mod app;
mod config;
mod image;

use app::TintlabApp;
use config::{AppConfig, WindowConfig};
use std::path::PathBuf;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("tintlab=info"))
        .format_timestamp_millis()
        .init();
}

fn main() -> eframe::Result<()> {
    init_logger();
    let initial_image_path: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window.inner_size())
            .with_min_inner_size(WindowConfig::MIN_SIZE),
        ..Default::default()
    };
    eframe::run_native(
        "Tintlab · Image Filters",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(TintlabApp::new_with_initial_path(
                &cc.egui_ctx,
                config,
                initial_image_path.as_deref(),
            )))
        }),
    )
}
