//! Chart-ready point sets for the presentation layer.
//!
//! Each series is paired with the step indices it belongs to, so a
//! renderer can plot it directly and mark the event horizon.

use glam::DVec2;

use crate::{series::SimulationSeries, types::Step};

pub const X_LABEL: &str = "Time Steps";
pub const HORIZON_LABEL: &str = "Event Horizon";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Entanglement,
    Gravity,
    Reflection,
    Order,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Entanglement,
        ChartKind::Gravity,
        ChartKind::Reflection,
        ChartKind::Order,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Entanglement => {
                "Entanglement Stabilization with Pre- and Post-Event Horizon Dynamics"
            }
            ChartKind::Gravity => "Gravitational Intensity Over Time (Pre-Event Horizon)",
            ChartKind::Reflection => {
                "Reflection Factor of Element 115 Over Time (Pre-Event Horizon)"
            }
            ChartKind::Order => "Order Dynamics Beyond the Event Horizon",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::Entanglement => "Entanglement Correlation",
            ChartKind::Gravity => "Gravitational Intensity",
            ChartKind::Reflection => "Reflection Factor",
            ChartKind::Order => "Order Level",
        }
    }

    /// Legend entry for the plotted line.
    pub fn series_label(self) -> &'static str {
        match self {
            ChartKind::Entanglement => "Entanglement Correlation",
            ChartKind::Gravity => "Gravitational Intensity",
            ChartKind::Reflection => "Reflection Factor (Element 115)",
            ChartKind::Order => "Order Dynamics",
        }
    }

    /// Step index of the first value in this kind's series.
    fn first_step(self, horizon: Step) -> Step {
        match self {
            ChartKind::Entanglement => 0,
            ChartKind::Gravity | ChartKind::Reflection => 1,
            ChartKind::Order => horizon + 1,
        }
    }

    fn values(self, series: &SimulationSeries) -> &[f64] {
        match self {
            ChartKind::Entanglement => series.entanglement(),
            ChartKind::Gravity => series.gravity(),
            ChartKind::Reflection => series.reflection(),
            ChartKind::Order => series.order(),
        }
    }
}

/// One line chart: `(step, value)` points plus the horizon marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub points: Vec<DVec2>,
    /// x position of the vertical event-horizon line.
    pub horizon: f64,
}

impl Chart {
    pub fn new(kind: ChartKind, series: &SimulationSeries, horizon: Step) -> Self {
        let first = kind.first_step(horizon);
        let points = kind
            .values(series)
            .iter()
            .enumerate()
            .map(|(i, &v)| DVec2::new((first + i) as f64, v))
            .collect();

        Self {
            kind,
            points,
            horizon: horizon as f64,
        }
    }

    /// `(min, max)` of the x coordinates, or `None` for an empty chart.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.x, last.x))
    }
}

/// Builds the four charts of a finished run, in [`ChartKind::ALL`] order.
pub fn charts(series: &SimulationSeries, horizon: Step) -> Vec<Chart> {
    ChartKind::ALL
        .iter()
        .map(|&kind| Chart::new(kind, series, horizon))
        .collect()
}
