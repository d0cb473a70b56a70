//! Static chart viewer for one simulation run, built with eframe/egui.
//!
//! [`Viewer`] runs the engine once at construction and then only renders:
//! four line charts in a 2×2 grid, each with the event horizon marked, and
//! a status bar summarizing the run.

use eframe::App;
use egui_plot::{Corner, Legend, Line, LineStyle, Plot, PlotPoints, VLine};
use glam::DVec2;
use sim_core::{
    SimResult, SimulationParameters,
    chart::{self, Chart, HORIZON_LABEL, X_LABEL},
};

const SERIES_COLOR: egui::Color32 = egui::Color32::from_rgb(70, 130, 200);
const HORIZON_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 50, 50);

/// Vertical space per chart taken by its heading and spacing.
const CHART_CHROME: f32 = 28.0;
const MIN_CHART_HEIGHT: f32 = 120.0;

/// Headline numbers shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
struct RunSummary {
    steps: usize,
    horizon: usize,
    final_entanglement: f64,
    peak_gravity: Option<f64>,
    final_order: Option<f64>,
}

/// Application state: the parameters and the finished charts.
///
/// ### Fields
/// - `params` - Parameters the run was computed from.
/// - `charts` - The four charts in [`chart::ChartKind::ALL`] order.
/// - `summary` - Values for the status bar.
pub struct Viewer {
    params: SimulationParameters,
    charts: Vec<Chart>,
    summary: RunSummary,
}

impl Viewer {
    /// Runs the simulation for `params` and prepares the charts.
    ///
    /// ### Errors
    /// Any [`sim_core::SimError`] from the run; no window should be opened
    /// in that case.
    pub fn new(params: SimulationParameters) -> SimResult<Self> {
        let series = sim_core::run(params.clone())?;
        let charts = chart::charts(&series, params.event_horizon_step);

        let summary = RunSummary {
            steps: series.steps(),
            horizon: params.event_horizon_step,
            final_entanglement: series
                .last_entanglement()
                .unwrap_or(params.initial_entanglement),
            peak_gravity: series.peak_gravity(),
            final_order: series.order().last().copied(),
        };

        Ok(Self {
            params,
            charts,
            summary,
        })
    }

    /// Converts chart points into the `[x, y]` pairs egui_plot expects.
    fn plot_points(points: &[DVec2]) -> Vec<[f64; 2]> {
        points.iter().map(|p| [p.x, p.y]).collect()
    }

    /// Height of each chart so that two rows fill `available` pixels.
    fn chart_height(available: f32) -> f32 {
        (available / 2.0 - CHART_CHROME).max(MIN_CHART_HEIGHT)
    }

    /// Draws one chart: heading, line, and dashed horizon marker.
    fn draw_chart(ui: &mut egui::Ui, chart: &Chart, height: f32) {
        ui.label(egui::RichText::new(chart.kind.title()).strong());

        let pts = Self::plot_points(&chart.points);

        Plot::new(chart.kind.title())
            .height(height)
            .legend(Legend::default().position(Corner::RightTop))
            .x_axis_label(X_LABEL)
            .y_axis_label(chart.kind.y_label())
            .include_x(0.0)
            .include_y(0.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(chart.kind.series_label(), PlotPoints::from(pts))
                        .color(SERIES_COLOR)
                        .width(2.0),
                );
                plot_ui.vline(
                    VLine::new(HORIZON_LABEL, chart.horizon)
                        .color(HORIZON_COLOR)
                        .width(1.5)
                        .style(LineStyle::dashed_loose()),
                );
            });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(order) = self.summary.final_order {
                    ui.label(format!("final order = {order:.3}"));
                }
                if let Some(g) = self.summary.peak_gravity {
                    ui.label(format!("peak gravity = {g:.3}"));
                }
                ui.label(format!(
                    "final entanglement = {:.4}",
                    self.summary.final_entanglement
                ));
                ui.separator();
                ui.label(format!("horizon = {}", self.summary.horizon));
                ui.label(format!("steps = {}", self.summary.steps));
            });
        });
    }

    /// Builds the central 2×2 chart grid.
    fn ui_central_panel(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.params.time_steps == 0 {
                ui.label("No time steps to plot.");
                return;
            }

            let height = Self::chart_height(ui.available_height());
            for row in self.charts.chunks(2) {
                ui.columns(2, |cols| {
                    for (col, chart) in cols.iter_mut().zip(row) {
                        Self::draw_chart(col, chart, height);
                    }
                });
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that lays out the status bar and the chart grid.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}
