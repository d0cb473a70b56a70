//! Discrete-time simulation of entanglement correlation across an event
//! horizon.
//!
//! Main components:
//! - [`engine`] — the step loop and the [`run`] entry point.
//! - [`phases`] — pure per-step transitions for the two regimes.
//! - [`config`] — the immutable parameter set and its validation.
//! - [`series`] — the four output series.
//! - [`chart`] — index-aligned point sets for plotting.
//! - [`error`] — the error type.
//! - [`types`] — step index, regime and per-step record.

pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod phases;
pub mod series;
pub mod types;

pub use config::SimulationParameters;
pub use engine::{SimulationEngine, run};
pub use error::{SimError, SimResult};
pub use series::SimulationSeries;
pub use types::{Regime, Step, StepRecord};
