//! SerialVis-RS - Main Entry Point
//!
//! Live plotting of line-delimited numeric data from serial devices and
//! locally launched scripts.

use serialvis_rs::{config::AppConfig, frontend::PlotterApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,serialvis_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SerialVis-RS");

    let config = AppConfig::load_or_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("SerialVis-RS"),
        ..Default::default()
    };

    eframe::run_native(
        "SerialVis-RS",
        native_options,
        Box::new(|cc| Ok(Box::new(PlotterApp::new(cc, config)))),
    )
}
