//! Per-step state transitions for the two dynamical regimes.
//!
//! A step is a pure function of the parameters, the step index and the
//! entanglement carried over from the previous step:
//! 1. [`pre_horizon_step`] — for `t <= event_horizon_step`: capped
//!    exponential gravity, reflection factor, decay plus logarithmic
//!    feedback amplification.
//! 2. [`post_horizon_step`] — for `t > event_horizon_step`: gravity and
//!    reflection drop to zero, order grows linearly and an exponentially
//!    decaying stabilization factor relaxes entanglement toward 1.
//!
//! [`advance`] picks the regime for `t` and dispatches.

use crate::{
    config::SimulationParameters,
    error::{SimError, SimResult},
    types::{Regime, Step, StepRecord},
};

/// Clamps a value into `[0, 1]`.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn finite(value: f64, quantity: &'static str, step: Step) -> SimResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::NumericOverflow { quantity, step })
    }
}

/// Gravitational intensity at step `t`.
///
/// `min(initial_gravity * exp(growth_rate * t), max_gravitational_pull)`.
/// The uncapped exponential must be representable; if it overflows the
/// step fails rather than silently saturating at the cap.
///
/// ### Errors
/// [`SimError::NumericOverflow`] if the uncapped value is not finite.
pub fn gravity_intensity(params: &SimulationParameters, t: Step) -> SimResult<f64> {
    let uncapped =
        params.initial_gravity * (params.gravitational_growth_rate * t as f64).exp();
    let uncapped = finite(uncapped, "gravitational intensity", t)?;
    Ok(uncapped.min(params.max_gravitational_pull))
}

/// Reflection factor `1 / (1 + efficiency * gravity)`.
///
/// Lies in `(0, 1]` for non-negative inputs and decreases as gravity rises.
#[inline]
pub fn reflection_factor(gravity: f64, efficiency: f64) -> f64 {
    1.0 / (1.0 + efficiency * gravity)
}

/// Amplification term fed by the current coherence:
/// `base_amplification_rate + feedback_efficiency * ln(1 + max(0, e))`.
#[inline]
pub fn amplification(params: &SimulationParameters, entanglement: f64) -> f64 {
    let residual_coherence = entanglement.max(0.0);
    params.base_amplification_rate + params.feedback_efficiency * (1.0 + residual_coherence).ln()
}

/// Order level at step `t`, linear in the distance past the horizon.
#[inline]
pub fn order_level(params: &SimulationParameters, t: Step) -> f64 {
    params.order_growth_rate * t.saturating_sub(params.event_horizon_step) as f64
}

/// `exp(-order)`: strong pull right after the horizon, vanishing as order
/// accumulates.
#[inline]
pub fn stabilization_factor(order: f64) -> f64 {
    (-order).exp()
}

/// Computes one pre-horizon step.
///
/// ### Parameters
/// - `params` - Validated parameter set.
/// - `t` - 1-indexed step, expected to satisfy `t <= event_horizon_step`.
/// - `prev` - Entanglement after step `t - 1`.
///
/// ### Returns
/// The step's gravity, reflection and clamped entanglement. `order` is
/// always `None`.
pub fn pre_horizon_step(
    params: &SimulationParameters,
    t: Step,
    prev: f64,
) -> SimResult<StepRecord> {
    let gravity = gravity_intensity(params, t)?;
    let reflection = finite(
        reflection_factor(gravity, params.reflection_efficiency),
        "reflection factor",
        t,
    )?;
    let amp = finite(amplification(params, prev), "amplification", t)?;

    // Existing correlation decays with proximity to the maximum pull.
    let raw = prev * (1.0 - gravity / params.max_gravitational_pull) + amp;
    let raw = finite(raw, "entanglement", t)?;

    Ok(StepRecord {
        step: t,
        regime: Regime::PreHorizon,
        gravity,
        reflection,
        order: None,
        entanglement: clamp_unit(raw),
    })
}

/// Computes one post-horizon step.
///
/// Gravity and reflection are exactly `0.0`. Entanglement relaxes toward 1
/// as `prev + (1 - prev) * exp(-order)`.
///
/// ### Errors
/// [`SimError::NumericOverflow`] if the order level or the stabilization
/// factor is not finite (e.g. a large negative `order_growth_rate`).
pub fn post_horizon_step(
    params: &SimulationParameters,
    t: Step,
    prev: f64,
) -> SimResult<StepRecord> {
    let order = finite(order_level(params, t), "order level", t)?;
    let stabilization = finite(stabilization_factor(order), "stabilization factor", t)?;

    let raw = finite(prev + (1.0 - prev) * stabilization, "entanglement", t)?;

    Ok(StepRecord {
        step: t,
        regime: Regime::PostHorizon,
        gravity: 0.0,
        reflection: 0.0,
        order: Some(order),
        entanglement: clamp_unit(raw),
    })
}

/// Advances the state by one step, choosing the regime from `t`.
pub fn advance(params: &SimulationParameters, t: Step, prev: f64) -> SimResult<StepRecord> {
    match Regime::at(t, params.event_horizon_step) {
        Regime::PreHorizon => pre_horizon_step(params, t, prev),
        Regime::PostHorizon => post_horizon_step(params, t, prev),
    }
}
