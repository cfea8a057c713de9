use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::common::{Depth, Gas, GasStatus, GasType, Parameters, PlanError, Pressure, Time};
use crate::plan::profile::DivePlan;

/// Caller-supplied cancellation flag checked between planner iterations.
/// Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), PlanError> {
        if self.is_cancelled() {
            return Err(PlanError::Cancelled);
        }
        Ok(())
    }
}

impl DivePlan {
    /// How long the first stop can be held before the time to surface
    /// exceeds its budget; returns (total first-stop minutes, TTS there).
    ///
    /// The search is monotone: coarse doubling finds an infeasible bound,
    /// bisection refines to the minute. The plan itself is left untouched.
    pub fn max_time_and_tts(&self, token: &CancelToken) -> Result<(f64, f64), PlanError> {
        let mut base = self.clone();
        base.first_stop_extension = Time::zero();
        base.build()?;

        let Some(first_stop) = base.first_stop_index() else {
            return Ok((0., base.tts_from_first_stop().as_minutes()));
        };
        let original_minutes = base.steps()[first_stop].time.as_minutes();
        let original_tts = base.tts_from_first_stop();
        let budget = original_tts + base.params().tts_budget;

        let tts_with_extension = |extra: u32| -> Result<Option<Time>, PlanError> {
            token.check()?;
            let mut trial = self.clone();
            trial.first_stop_extension = Time::from_minutes(extra as f64);
            match trial.build() {
                Ok(()) => Ok(Some(trial.tts_from_first_stop())),
                Err(PlanError::Unplannable { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        };

        let feasible = |tts: Option<Time>| matches!(tts, Some(t) if t <= budget);

        // coarse doubling to bracket the limit
        let mut last_good: (u32, Time) = (0, original_tts);
        let mut hi: u32 = 1;
        loop {
            let tts = tts_with_extension(hi)?;
            if feasible(tts) {
                last_good = (hi, tts.unwrap_or(original_tts));
                hi *= 2;
            } else {
                break;
            }
        }

        // refine between the brackets
        let mut lo = last_good.0;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let tts = tts_with_extension(mid)?;
            if feasible(tts) {
                last_good = (mid, tts.unwrap_or(last_good.1));
                lo = mid;
            } else {
                hi = mid;
            }
        }

        Ok((
            original_minutes + last_good.0 as f64,
            last_good.1.as_minutes(),
        ))
    }

    /// Rebuilds the plan once per active deco gas, each as the sole deco
    /// candidate, and keeps the selection minimizing total ascent time
    /// (ties: lower CNS, then lower consumption). Returns the improvement
    /// in ascent minutes; the plan is only mutated when one is found.
    pub fn optimise_deco_gas(&mut self, token: &CancelToken) -> Result<f64, PlanError> {
        let mut baseline = self.clone();
        baseline.build()?;
        let baseline_metric = metric_of(&baseline);

        let candidates = baseline.gas_list().active_of_type(GasType::Deco);
        if candidates.len() <= 1 {
            return Ok(0.);
        }

        let mut best: Option<(usize, (f64, f64, f64))> = None;
        for &candidate in candidates.iter() {
            token.check()?;
            let mut trial = self.clone();
            for &other in candidates.iter() {
                if other != candidate {
                    trial.gas_list_mut().set_status(other, GasStatus::Inactive);
                }
            }
            if trial.build().is_err() {
                continue;
            }
            let metric = metric_of(&trial);
            let better = match &best {
                None => true,
                Some((_, best_metric)) => metric < *best_metric,
            };
            if better {
                best = Some((candidate, metric));
            }
        }

        let Some((winner, winner_metric)) = best else {
            return Ok(0.);
        };
        if winner_metric >= baseline_metric {
            return Ok(0.);
        }

        for &other in candidates.iter() {
            if other != winner {
                self.gas_list_mut().set_status(other, GasStatus::Inactive);
            }
        }
        self.build()?;
        Ok(baseline_metric.0 - winner_metric.0)
    }

    /// The mix maximizing deco efficiency at a depth: O2 to the PpO2 limit
    /// of the gas type, He to the END limit, N2 the remainder.
    pub fn best_gas_for_depth(
        depth: Depth,
        gas_type: GasType,
        params: &Parameters,
    ) -> Result<Gas, PlanError> {
        let env = params.environment;
        let p_amb = env.pressure_at_depth(depth);
        let limit = params.max_ppo2_for(gas_type);

        let o2_pct = ((100. * limit / p_amb).floor()).clamp(5., 100.);

        let p_end_limit: Pressure = env.pressure_at_depth(params.end_limit);
        let he_pct = if params.o2_narcotic {
            (100. * (1. - p_end_limit / p_amb)).floor()
        } else {
            let n2_fraction_allowed =
                crate::common::AIR_N2_FRACTION * p_end_limit / p_amb;
            100. - o2_pct - (100. * n2_fraction_allowed).floor()
        };
        // no helium needed when the narcotic load already fits
        let he_pct = he_pct.max(0.).min(100. - o2_pct);

        Gas::new(o2_pct, he_pct, gas_type)
    }
}

/// (ascent minutes, CNS, consumed liters) in tie-break order.
fn metric_of(plan: &DivePlan) -> (f64, f64, f64) {
    (
        plan.ascent_time().as_minutes(),
        plan.cns(),
        plan.consumption().total_liters,
    )
}
