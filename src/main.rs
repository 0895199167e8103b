mod app;
mod color;
mod config;
mod data;
mod dispatch;
mod engine;
mod state;
mod ui;

use std::path::PathBuf;

use app::UfoLensApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut config = ViewerConfig::discover();
    // A CSV path on the command line wins over the config file.
    if let Some(path) = std::env::args_os().nth(1) {
        config.data_path = Some(PathBuf::from(path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "UFO Lens – Sightings Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(UfoLensApp::new(config)))),
    )
}
