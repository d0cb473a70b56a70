//! Application entry point for the event-horizon entanglement viewer.
//!
//! This binary sets up logging and eframe/egui, runs the simulation once,
//! and hands the finished charts to [`Viewer`] from the `viewer` module.

mod viewer;

use anyhow::Context;
use sim_core::SimulationParameters;
use viewer::Viewer;

const TITLE: &str = "Entanglement Across the Event Horizon";

/// Reads parameters from the JSON file named by the first argument, or
/// falls back to the defaults.
fn load_parameters() -> anyhow::Result<SimulationParameters> {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("no parameter file given, using defaults");
        return Ok(SimulationParameters::default());
    };

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading parameters from {path}"))?;
    let params = SimulationParameters::from_json(&json)
        .with_context(|| format!("loading parameters from {path}"))?;
    log::info!("loaded parameters from {path}");
    Ok(params)
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the window runs to completion.
/// - `Err` if the parameters are unusable, the simulation fails, or eframe
///   cannot create the window.
fn main() -> anyhow::Result<()> {
    // info+ by default; RUST_LOG overrides (e.g. RUST_LOG=sim_core=trace).
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let params = load_parameters()?;
    let viewer = Viewer::new(params).context("running simulation")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(TITLE, options, Box::new(move |_cc| Ok(Box::new(viewer))))
        .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
