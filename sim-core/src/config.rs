use serde::{Deserialize, Serialize};

use crate::{
    error::{SimError, SimResult},
    types::Step,
};

/// Speed of light in m/s. Carried in the parameter set but unused by the
/// dynamics.
pub const SPEED_OF_LIGHT: f64 = 3e8;

/// Immutable parameter set for one simulation run.
///
/// Every field has a default (see the [`Default`] impl), and the struct
/// deserializes with `#[serde(default)]`, so a partial JSON document only
/// overrides the fields it names.
///
/// Rates and efficiencies are not sign-checked: negative values are
/// simulated as given (decaying gravity, shrinking order, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub speed_of_light: f64,
    /// Entanglement at step 0. Not clamped; the first update clamps.
    pub initial_entanglement: f64,
    pub initial_gravity: f64,
    pub gravitational_growth_rate: f64,
    /// Ceiling on gravitational intensity; also the denominator of the
    /// pre-horizon decay term, so it must be non-zero.
    pub max_gravitational_pull: f64,
    pub time_steps: Step,
    pub base_amplification_rate: f64,
    pub reflection_efficiency: f64,
    pub feedback_efficiency: f64,
    pub order_growth_rate: f64,
    /// Last step governed by pre-horizon dynamics.
    pub event_horizon_step: Step,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            speed_of_light: SPEED_OF_LIGHT,
            initial_entanglement: 1.0,
            initial_gravity: 1.0,
            gravitational_growth_rate: 0.05,
            max_gravitational_pull: 50.0,
            time_steps: 100,
            base_amplification_rate: 0.005,
            reflection_efficiency: 0.1,
            feedback_efficiency: 0.2,
            order_growth_rate: 0.1,
            event_horizon_step: 40,
        }
    }
}

impl SimulationParameters {
    /// Checks the preconditions the engine relies on.
    ///
    /// ### Errors
    /// [`SimError::InvalidParameter`] when
    /// - any real-valued field is NaN or infinite,
    /// - `max_gravitational_pull == 0`,
    /// - `time_steps > 0` and `event_horizon_step` is not in `1..=time_steps`.
    ///
    /// With `time_steps == 0` the horizon is irrelevant and not checked.
    pub fn validate(&self) -> SimResult<()> {
        let reals = [
            ("speed_of_light", self.speed_of_light),
            ("initial_entanglement", self.initial_entanglement),
            ("initial_gravity", self.initial_gravity),
            ("gravitational_growth_rate", self.gravitational_growth_rate),
            ("max_gravitational_pull", self.max_gravitational_pull),
            ("base_amplification_rate", self.base_amplification_rate),
            ("reflection_efficiency", self.reflection_efficiency),
            ("feedback_efficiency", self.feedback_efficiency),
            ("order_growth_rate", self.order_growth_rate),
        ];
        for (name, value) in reals {
            if !value.is_finite() {
                return Err(SimError::invalid(name, format!("must be finite, got {value}")));
            }
        }

        if self.max_gravitational_pull == 0.0 {
            return Err(SimError::invalid(
                "max_gravitational_pull",
                "must be non-zero (divides the pre-horizon decay term)",
            ));
        }

        if self.time_steps > 0
            && (self.event_horizon_step == 0 || self.event_horizon_step > self.time_steps)
        {
            return Err(SimError::invalid(
                "event_horizon_step",
                format!(
                    "must be in 1..={}, got {}",
                    self.time_steps, self.event_horizon_step
                ),
            ));
        }

        Ok(())
    }

    /// Parses a (possibly partial) JSON document and validates the result.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| SimError::invalid("parameters", format!("JSON parse error: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Number of post-horizon steps, i.e. the length of the order series.
    #[inline]
    pub fn post_horizon_steps(&self) -> usize {
        self.time_steps.saturating_sub(self.event_horizon_step)
    }
}
