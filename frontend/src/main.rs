use std::sync::Arc;

use anyhow::{anyhow, Context};
use log::info;

use crate::{app::App, backend::HttpBackend, config::Config};

mod app;
mod backend;
mod config;
mod painter;
mod worker;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    info!("using backend at {}", config.backend_url);
    let backend = HttpBackend::new(&config.backend_url, config.http_timeout)
        .context("failed to set up the backend client")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Maze Solver")
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Maze Solver",
        native_options,
        Box::new(move |cc| Box::new(App::new(cc, config, Arc::new(backend)))),
    )
    .map_err(|e| anyhow!("failed to run the ui: {e}"))
}
