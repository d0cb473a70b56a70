use crate::{config::SimulationParameters, types::StepRecord};

/// Upper bound on the up-front reservation per buffer; longer runs grow on
/// demand.
const PREALLOC_CAP: usize = 1 << 16;

/// The four time-indexed output series of a run.
///
/// Index alignment:
/// - `entanglement[i]` is the value after step `i` (index 0 is the initial
///   value), so its length is `time_steps + 1`.
/// - `gravity[i]` and `reflection[i]` belong to step `i + 1`.
/// - `order[i]` belongs to step `event_horizon_step + 1 + i`.
///
/// Only the engine appends; callers get read-only slices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationSeries {
    entanglement: Vec<f64>,
    gravity: Vec<f64>,
    reflection: Vec<f64>,
    order: Vec<f64>,
}

impl SimulationSeries {
    /// Creates the series for a run, seeded with the initial entanglement
    /// and pre-allocated to their final lengths up to [`PREALLOC_CAP`].
    pub(crate) fn for_run(params: &SimulationParameters) -> Self {
        let steps = params.time_steps.min(PREALLOC_CAP);
        let mut entanglement = Vec::with_capacity(steps + 1);
        entanglement.push(params.initial_entanglement);

        Self {
            entanglement,
            gravity: Vec::with_capacity(steps),
            reflection: Vec::with_capacity(steps),
            order: Vec::with_capacity(params.post_horizon_steps().min(PREALLOC_CAP)),
        }
    }

    /// Appends everything one step produced.
    pub(crate) fn record(&mut self, rec: &StepRecord) {
        self.gravity.push(rec.gravity);
        self.reflection.push(rec.reflection);
        if let Some(order) = rec.order {
            self.order.push(order);
        }
        self.entanglement.push(rec.entanglement);
    }

    pub fn entanglement(&self) -> &[f64] {
        &self.entanglement
    }

    pub fn gravity(&self) -> &[f64] {
        &self.gravity
    }

    pub fn reflection(&self) -> &[f64] {
        &self.reflection
    }

    pub fn order(&self) -> &[f64] {
        &self.order
    }

    /// Number of completed steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.gravity.len()
    }

    /// Most recent entanglement value.
    pub fn last_entanglement(&self) -> Option<f64> {
        self.entanglement.last().copied()
    }

    /// Largest gravitational intensity seen so far.
    pub fn peak_gravity(&self) -> Option<f64> {
        self.gravity.iter().copied().reduce(f64::max)
    }
}
