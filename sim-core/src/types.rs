/// A 1-indexed simulation time step.
///
/// Step `0` only ever refers to the initial entanglement value; the
/// state-transition loop runs over `1..=time_steps`.
pub type Step = usize;

/// Which dynamics govern a given step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    /// `t <= event_horizon_step`: capped gravitational growth, decay plus
    /// logarithmic feedback amplification.
    PreHorizon,
    /// `t > event_horizon_step`: gravity and reflection vanish, order grows
    /// linearly and pulls entanglement toward 1.
    PostHorizon,
}

impl Regime {
    /// Regime of step `t` for a given horizon. Pure function of its inputs.
    #[inline]
    pub fn at(t: Step, event_horizon_step: Step) -> Self {
        if t <= event_horizon_step {
            Regime::PreHorizon
        } else {
            Regime::PostHorizon
        }
    }

    /// Short lowercase name for log lines.
    pub fn label(self) -> &'static str {
        match self {
            Regime::PreHorizon => "pre-horizon",
            Regime::PostHorizon => "post-horizon",
        }
    }
}

/// Everything a single step produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRecord {
    pub step: Step,
    pub regime: Regime,
    pub gravity: f64,
    pub reflection: f64,
    /// Only present after the horizon.
    pub order: Option<f64>,
    /// Entanglement after clamping to `[0, 1]`.
    pub entanglement: f64,
}
