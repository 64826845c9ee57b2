//! Omok GUI
//!
//! A graphical interface for playing Omok against the engine or another player.

use omok::ui::OmokApp;
use omok::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("omok=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration, using defaults");
            Config::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Omok"),
        ..Default::default()
    };

    eframe::run_native(
        "Omok",
        options,
        Box::new(move |cc| Ok(Box::new(OmokApp::new(cc, config)))),
    )
}
