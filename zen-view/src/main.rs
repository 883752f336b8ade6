//! Application entry point for the ZenParticles viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod camera;
mod viewer;

use viewer::{Viewer, ViewerOptions};

/// Starts the native eframe application.
///
/// Command-line flags are described on [`ViewerOptions`]. Set `RUST_LOG`
/// (e.g. `RUST_LOG=debug`) to see shape switches and gesture traffic.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = ViewerOptions::from_args(std::env::args().skip(1));
    let viewer = match Viewer::new(opts) {
        Ok(viewer) => viewer,
        Err(err) => {
            log::error!("cannot start: {err}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ZenParticles 3D",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
}
