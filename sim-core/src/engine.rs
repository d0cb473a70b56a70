//! The simulation engine: a fold of [`phases::advance`] over
//! `1..=time_steps`, carrying one scalar of state.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    config::SimulationParameters,
    error::{SimError, SimResult},
    phases,
    series::SimulationSeries,
    types::{Regime, Step, StepRecord},
};

/// Owns the parameters, the running entanglement and the output series
/// for exactly one run.
///
/// The typical use is [`SimulationEngine::run`] (or the free function
/// [`crate::run`]). [`SimulationEngine::step_once`] exposes the same loop
/// one step at a time.
#[derive(Debug)]
pub struct SimulationEngine {
    params: SimulationParameters,
    /// Number of completed steps.
    step: Step,
    entanglement: f64,
    series: SimulationSeries,
}

impl SimulationEngine {
    /// Validates `params` and prepares an engine at step 0.
    ///
    /// ### Errors
    /// [`SimError::InvalidParameter`] from
    /// [`SimulationParameters::validate`]. No work is done in that case.
    pub fn new(params: SimulationParameters) -> SimResult<Self> {
        if let Err(e) = params.validate() {
            log::warn!("rejected simulation parameters: {e}");
            return Err(e);
        }

        let series = SimulationSeries::for_run(&params);
        Ok(Self {
            entanglement: params.initial_entanglement,
            params,
            step: 0,
            series,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Number of steps completed so far.
    pub fn current_step(&self) -> Step {
        self.step
    }

    /// Entanglement after the last completed step.
    pub fn entanglement(&self) -> f64 {
        self.entanglement
    }

    /// Regime of the next step, or `None` once finished.
    pub fn regime(&self) -> Option<Regime> {
        (!self.is_finished())
            .then(|| Regime::at(self.step + 1, self.params.event_horizon_step))
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.params.time_steps
    }

    /// Series accumulated so far.
    pub fn series(&self) -> &SimulationSeries {
        &self.series
    }

    /// Computes and records the next step.
    ///
    /// ### Returns
    /// - `Ok(Some(record))` after a successful step.
    /// - `Ok(None)` if all `time_steps` have already run.
    ///
    /// ### Errors
    /// [`SimError::NumericOverflow`] if the step produced a non-finite
    /// value. The engine state is left untouched in that case.
    pub fn step_once(&mut self) -> SimResult<Option<StepRecord>> {
        if self.is_finished() {
            return Ok(None);
        }

        let t = self.step + 1;
        let rec = phases::advance(&self.params, t, self.entanglement)?;

        if t - 1 == self.params.event_horizon_step {
            log::debug!(
                "crossed event horizon at step {t}, entanglement {:.6}",
                self.entanglement
            );
        }
        log::trace!(
            "step {t} ({}): g={:.6} r={:.6} e={:.6}",
            rec.regime.label(),
            rec.gravity,
            rec.reflection,
            rec.entanglement
        );

        self.series.record(&rec);
        self.entanglement = rec.entanglement;
        self.step = t;
        Ok(Some(rec))
    }

    /// Runs every remaining step and hands back the finished series.
    pub fn run(mut self) -> SimResult<SimulationSeries> {
        while self.step_once()?.is_some() {}
        Ok(self.finish())
    }

    /// Like [`SimulationEngine::run`], but checks `cancel` before each step.
    ///
    /// ### Errors
    /// [`SimError::Cancelled`] as soon as the flag is observed set; the
    /// partially filled series are dropped.
    pub fn run_with_cancel(mut self, cancel: &AtomicBool) -> SimResult<SimulationSeries> {
        while !self.is_finished() {
            if cancel.load(Ordering::Relaxed) {
                let step = self.step + 1;
                log::warn!("simulation cancelled before step {step}");
                return Err(SimError::Cancelled { step });
            }
            self.step_once()?;
        }
        Ok(self.finish())
    }

    fn finish(self) -> SimulationSeries {
        log::info!(
            "simulation finished: {} steps, horizon at {}, final entanglement {:.6}",
            self.step,
            self.params.event_horizon_step,
            self.entanglement
        );
        self.series
    }
}

/// Runs a full simulation for `params`.
///
/// Deterministic: identical parameters always produce identical series.
///
/// ### Errors
/// Any [`SimError`]; either all four series are produced or none are.
pub fn run(params: SimulationParameters) -> SimResult<SimulationSeries> {
    SimulationEngine::new(params)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn defaults() -> SimulationParameters {
        SimulationParameters::default()
    }

    fn assert_shape(s: &SimulationSeries, p: &SimulationParameters) {
        assert_eq!(s.entanglement().len(), p.time_steps + 1);
        assert_eq!(s.gravity().len(), p.time_steps);
        assert_eq!(s.reflection().len(), p.time_steps);
        assert_eq!(s.order().len(), p.time_steps - p.event_horizon_step);
    }

    #[test]
    fn default_run_matches_reference_values() {
        let p = defaults();
        let s = run(p.clone()).unwrap();
        assert_shape(&s, &p);

        assert_eq!(s.entanglement()[0], 1.0);
        assert!((s.gravity()[0] - 1.0513).abs() < 1e-4);
        assert!((s.reflection()[0] - 0.9049).abs() < 1e-4);

        let g = 0.05f64.exp();
        let e1 = phases::clamp_unit(1.0 * (1.0 - g / 50.0) + 0.005 + 0.2 * 2.0f64.ln());
        assert_eq!(s.entanglement()[1], e1);

        // Step 41 is the first post-horizon step.
        assert!((s.order()[0] - 0.1).abs() < 1e-12);
        assert_eq!(s.gravity()[40], 0.0);
        assert_eq!(s.reflection()[40], 0.0);
        assert!(s.gravity()[39] > 0.0);
    }

    #[test]
    fn entanglement_stays_in_unit_interval() {
        let s = run(defaults()).unwrap();
        assert!(s.entanglement().iter().all(|e| (0.0..=1.0).contains(e)));
    }

    #[test]
    fn gravity_is_monotone_then_zero() {
        let p = SimulationParameters {
            gravitational_growth_rate: 0.2,
            max_gravitational_pull: 20.0,
            ..defaults()
        };
        let s = run(p.clone()).unwrap();
        let h = p.event_horizon_step;

        let pre = &s.gravity()[..h];
        assert!(pre.windows(2).all(|w| w[0] <= w[1]));
        for (i, g) in pre.iter().enumerate() {
            let uncapped = p.initial_gravity * (p.gravitational_growth_rate * (i + 1) as f64).exp();
            if uncapped >= p.max_gravitational_pull {
                assert_eq!(*g, p.max_gravitational_pull);
            } else {
                assert!(*g < p.max_gravitational_pull);
            }
        }
        // ln(20) / 0.2 ≈ 15, well before the horizon.
        assert_eq!(pre[h - 1], 20.0);
        assert!(s.gravity()[h..].iter().all(|g| *g == 0.0));
    }

    #[test]
    fn reflection_is_in_unit_interval_then_zero() {
        let p = defaults();
        let s = run(p.clone()).unwrap();
        let h = p.event_horizon_step;
        assert!(s.reflection()[..h].iter().all(|r| *r > 0.0 && *r <= 1.0));
        assert!(s.reflection()[h..].iter().all(|r| *r == 0.0));
    }

    #[test]
    fn order_strictly_increases_from_growth_rate() {
        let p = defaults();
        let s = run(p.clone()).unwrap();
        assert!((s.order()[0] - p.order_growth_rate).abs() < 1e-12);
        assert!(s.order().windows(2).all(|w| w[0] < w[1]));
        let last = *s.order().last().unwrap();
        assert!((last - p.order_growth_rate * 60.0).abs() < 1e-9);
    }

    #[test]
    fn post_horizon_entanglement_never_decreases() {
        let p = defaults();
        let s = run(p.clone()).unwrap();
        let post = &s.entanglement()[p.event_horizon_step..];
        assert!(post.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn runs_are_deterministic() {
        let a = run(defaults()).unwrap();
        let b = run(defaults()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn horizon_at_last_step_has_no_order() {
        let p = SimulationParameters {
            time_steps: 30,
            event_horizon_step: 30,
            ..defaults()
        };
        let s = run(p.clone()).unwrap();
        assert_shape(&s, &p);
        assert!(s.order().is_empty());
        assert!(s.gravity().iter().all(|g| *g > 0.0));
    }

    #[test]
    fn zero_steps_yield_singleton_series() {
        let p = SimulationParameters {
            time_steps: 0,
            event_horizon_step: 0,
            initial_entanglement: 0.3,
            ..defaults()
        };
        let s = run(p).unwrap();
        assert_eq!(s.entanglement(), &[0.3]);
        assert!(s.gravity().is_empty());
        assert!(s.reflection().is_empty());
        assert!(s.order().is_empty());
    }

    #[test]
    fn zero_max_pull_produces_no_series() {
        let p = SimulationParameters {
            max_gravitational_pull: 0.0,
            ..defaults()
        };
        assert!(matches!(
            run(p),
            Err(SimError::InvalidParameter {
                name: "max_gravitational_pull",
                ..
            })
        ));
    }

    #[test]
    fn overflow_aborts_the_whole_run() {
        let p = SimulationParameters {
            gravitational_growth_rate: 50.0,
            ..defaults()
        };
        // exp(50 * t) overflows f64 once t > 14.
        assert_eq!(
            run(p),
            Err(SimError::NumericOverflow {
                quantity: "gravitational intensity",
                step: 15
            })
        );
    }

    #[test]
    fn failed_step_leaves_engine_untouched() {
        let p = SimulationParameters {
            gravitational_growth_rate: 50.0,
            ..defaults()
        };
        let mut engine = SimulationEngine::new(p).unwrap();
        for _ in 0..14 {
            engine.step_once().unwrap();
        }
        let before = engine.series().clone();
        assert!(engine.step_once().is_err());
        assert_eq!(engine.current_step(), 14);
        assert_eq!(engine.series(), &before);
    }

    #[test]
    fn step_once_walks_both_regimes_then_stops() {
        let p = SimulationParameters {
            time_steps: 3,
            event_horizon_step: 2,
            ..defaults()
        };
        let mut engine = SimulationEngine::new(p).unwrap();
        assert_eq!(engine.regime(), Some(Regime::PreHorizon));

        let r1 = engine.step_once().unwrap().unwrap();
        let r2 = engine.step_once().unwrap().unwrap();
        assert_eq!(engine.regime(), Some(Regime::PostHorizon));
        let r3 = engine.step_once().unwrap().unwrap();

        assert_eq!((r1.step, r2.step, r3.step), (1, 2, 3));
        assert_eq!(r2.regime, Regime::PreHorizon);
        assert_eq!(r3.regime, Regime::PostHorizon);
        assert_eq!(engine.entanglement(), r3.entanglement);

        assert!(engine.is_finished());
        assert_eq!(engine.regime(), None);
        assert_eq!(engine.step_once().unwrap(), None);
        assert_eq!(engine.series().steps(), 3);
    }

    #[test]
    fn stepping_matches_full_run() {
        let mut engine = SimulationEngine::new(defaults()).unwrap();
        while engine.step_once().unwrap().is_some() {}
        assert_eq!(engine.series(), &run(defaults()).unwrap());
    }

    #[test]
    fn cancel_flag_stops_before_first_step() {
        let cancel = AtomicBool::new(true);
        let engine = SimulationEngine::new(defaults()).unwrap();
        assert_eq!(
            engine.run_with_cancel(&cancel),
            Err(SimError::Cancelled { step: 1 })
        );
    }

    #[test]
    fn huge_step_count_can_be_cancelled() {
        let p = SimulationParameters {
            time_steps: usize::MAX,
            event_horizon_step: 40,
            ..defaults()
        };
        let engine = SimulationEngine::new(p).unwrap();
        assert_eq!(engine.regime(), Some(Regime::PreHorizon));

        let cancel = AtomicBool::new(true);
        assert_eq!(
            engine.run_with_cancel(&cancel),
            Err(SimError::Cancelled { step: 1 })
        );
    }

    #[test]
    fn huge_step_count_from_json_steps_normally() {
        let p = SimulationParameters::from_json(
            r#"{ "time_steps": 18446744073709551615, "event_horizon_step": 1 }"#,
        )
        .unwrap();
        let mut engine = SimulationEngine::new(p).unwrap();

        let r1 = engine.step_once().unwrap().unwrap();
        let r2 = engine.step_once().unwrap().unwrap();
        assert_eq!(r1.regime, Regime::PreHorizon);
        assert_eq!(r2.order, Some(0.1));
        assert!(!engine.is_finished());
        assert_eq!(engine.series().entanglement().len(), 3);
    }

    #[test]
    fn unset_cancel_flag_runs_to_completion() {
        let cancel = AtomicBool::new(false);
        let engine = SimulationEngine::new(defaults()).unwrap();
        assert_eq!(
            engine.run_with_cancel(&cancel).unwrap(),
            run(defaults()).unwrap()
        );
    }

    #[test]
    fn random_valid_parameters_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let time_steps = rng.random_range(1..=150);
            let p = SimulationParameters {
                initial_entanglement: rng.random_range(0.0..=1.0),
                initial_gravity: rng.random_range(0.1..5.0),
                gravitational_growth_rate: rng.random_range(0.0..0.3),
                max_gravitational_pull: rng.random_range(1.0..100.0),
                time_steps,
                base_amplification_rate: rng.random_range(0.0..0.05),
                reflection_efficiency: rng.random_range(0.0..1.0),
                feedback_efficiency: rng.random_range(0.0..1.0),
                order_growth_rate: rng.random_range(0.01..0.5),
                event_horizon_step: rng.random_range(1..=time_steps),
                ..defaults()
            };

            let s = run(p.clone()).unwrap();
            assert_shape(&s, &p);

            let h = p.event_horizon_step;
            assert!(s.entanglement().iter().all(|e| (0.0..=1.0).contains(e)));
            assert!(s.gravity()[..h].windows(2).all(|w| w[0] <= w[1]));
            assert!(s.gravity()[..h].iter().all(|g| *g <= p.max_gravitational_pull));
            assert!(s.reflection()[..h].iter().all(|r| *r > 0.0 && *r <= 1.0));
            assert!(s.gravity()[h..].iter().all(|g| *g == 0.0));
            assert!(s.reflection()[h..].iter().all(|r| *r == 0.0));
            assert!(s.order().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
