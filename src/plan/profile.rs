use crate::common::{
    Depth, DiveMode, DivePhase, Environment, Gas, GasList, Parameters, PlanError, PlanWarning,
    Pressure, SetPoints, StopSteps, Time,
};
use crate::common::OxTox;
use crate::plan::consumption::{self, ConsumptionSummary};
use crate::plan::dive_step::{DiveStep, StepWarnings};
use crate::zhl::{gf_at, SegmentLoad, TissueModel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// tolerance for depth comparisons against the stop grid
const DEPTH_EPSILON: f64 = 1e-9;

/// A complete dive plan: inputs, the computed step list and the tissue
/// trace. Collaborating configuration is snapshotted at build entry, so
/// mutating the originals between builds never disturbs a built plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DivePlan {
    target_depth: Depth,
    bottom_time: Time,
    mode: DiveMode,
    gf_boosted: bool,
    bailout_at: Option<Depth>,
    params: Parameters,
    gas_list: GasList,
    set_points: SetPoints,
    stop_steps: StopSteps,
    initial_tissues: Option<TissueModel>,
    /// held minutes added to the first stop, used by the MaxTime service
    pub(crate) first_stop_extension: Time,

    steps: Vec<DiveStep>,
    warnings: Vec<PlanWarning>,
    first_deco_depth: Option<Depth>,
}

impl DivePlan {
    /// A plan for `bottom_time` of run time at `target_depth`.
    ///
    /// `initial_tissues` carries residual loading from a preceding dive;
    /// `None` starts from surface saturation.
    pub fn new(
        target_depth: Depth,
        bottom_time: Time,
        mode: DiveMode,
        gf_boosted: bool,
        initial_tissues: Option<TissueModel>,
    ) -> Self {
        Self {
            target_depth,
            bottom_time,
            mode,
            gf_boosted,
            bailout_at: None,
            params: Parameters::default(),
            gas_list: GasList::default(),
            set_points: SetPoints::default(),
            stop_steps: StopSteps::default(),
            initial_tissues,
            first_stop_extension: Time::zero(),
            steps: vec![],
            warnings: vec![],
            first_deco_depth: None,
        }
    }

    pub fn with_parameters(mut self, params: Parameters) -> Self {
        self.params = params;
        self
    }

    pub fn with_gas_list(mut self, gas_list: GasList) -> Self {
        self.gas_list = gas_list;
        self
    }

    pub fn with_set_points(mut self, set_points: SetPoints) -> Self {
        self.set_points = set_points;
        self
    }

    pub fn with_stop_steps(mut self, stop_steps: StopSteps) -> Self {
        self.stop_steps = stop_steps;
        self
    }

    /// Depth at which a bailout plan leaves the loop during ascent. Without
    /// it bailout engages at the start of the ascent.
    pub fn with_bailout_at(mut self, depth: Depth) -> Self {
        self.bailout_at = Some(depth);
        self
    }

    pub fn mode(&self) -> DiveMode {
        self.mode
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn gas_list(&self) -> &GasList {
        &self.gas_list
    }

    pub(crate) fn gas_list_mut(&mut self) -> &mut GasList {
        &mut self.gas_list
    }

    pub fn set_points(&self) -> &SetPoints {
        &self.set_points
    }

    pub fn steps(&self) -> &[DiveStep] {
        &self.steps
    }

    pub fn get_step(&self, index: usize) -> Option<&DiveStep> {
        self.steps.get(index)
    }

    pub fn warnings(&self) -> &[PlanWarning] {
        &self.warnings
    }

    pub fn first_deco_depth(&self) -> Option<Depth> {
        self.first_deco_depth
    }

    /// Run time at surfacing.
    pub fn total_runtime(&self) -> Time {
        self.steps.last().map(|s| s.run_time).unwrap_or(Time::zero())
    }

    /// Time from leaving the bottom to surfacing.
    pub fn ascent_time(&self) -> Time {
        let bottom_end = self
            .steps
            .iter()
            .rfind(|s| s.phase == DivePhase::Bottom)
            .map(|s| s.run_time)
            .unwrap_or(Time::zero());
        self.total_runtime() - bottom_end
    }

    /// Index of the first held stop, user or deco.
    pub fn first_stop_index(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.is_stop())
    }

    /// Time from arriving at the first held stop to surfacing.
    pub fn tts_from_first_stop(&self) -> Time {
        match self.first_stop_index() {
            Some(i) => {
                let at_stop_start = self.steps[i].run_time - self.steps[i].time;
                self.total_runtime() - at_stop_start
            }
            None => self.ascent_time(),
        }
    }

    pub fn consumption(&self) -> ConsumptionSummary {
        consumption::summarize(&self.steps, &self.params)
    }

    /// Final CNS of the plan, single-dive counter.
    pub fn cns(&self) -> f64 {
        self.steps.last().map(|s| s.cns_single).unwrap_or(0.)
    }

    pub fn otu(&self) -> f64 {
        self.steps.last().map(|s| s.otu_total).unwrap_or(0.)
    }

    /// Generates the step list from the inputs.
    pub fn build(&mut self) -> Result<(), PlanError> {
        self.params.validate()?;
        let env = self.params.environment;
        self.gas_list.validate(&self.params, &env)?;

        let mut builder = ProfileBuilder::start(self)?;
        let outcome = builder.run();
        let (steps, first_deco_depth, warnings) = builder.finish();
        self.steps = steps;
        self.first_deco_depth = first_deco_depth;
        self.warnings = warnings;
        outcome
    }

    /// Recomputes every derived field for the existing step structure.
    ///
    /// Used when a non-structural input changed, e.g. a setpoint value;
    /// phases, depths, durations and gas assignments stay fixed.
    pub fn calculate(&mut self) -> Result<(), PlanError> {
        if self.steps.is_empty() {
            return self.build();
        }
        self.params.validate()?;

        let legs: Vec<Leg> = self
            .steps
            .iter()
            .map(|s| {
                let setpoint = match s.mode {
                    DiveMode::CC => Some(self.set_points.effective_setpoint(
                        s.max_depth(),
                        self.gf_boosted,
                        &self.params,
                    )),
                    _ => None,
                };
                Leg {
                    phase: s.phase,
                    mode: s.mode,
                    start_depth: s.start_depth,
                    end_depth: s.end_depth,
                    time: s.time,
                    gas: s.gas,
                    setpoint,
                }
            })
            .collect();

        let mut annotator = Annotator::new(&self.params, self.initial_tissues.clone());
        self.steps = legs.iter().map(|leg| annotator.annotate(leg)).collect();
        self.first_deco_depth = annotator.first_deco_depth;
        Ok(())
    }
}

impl core::fmt::Display for DivePlan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for step in self.steps.iter() {
            writeln!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Structural description of one segment before annotation.
#[derive(Debug, Clone, Copy)]
struct Leg {
    phase: DivePhase,
    mode: DiveMode,
    start_depth: Depth,
    end_depth: Depth,
    time: Time,
    gas: Gas,
    setpoint: Option<Pressure>,
}

/// Integrates tissue and toxicity state across legs and derives the
/// per-step physiology.
struct Annotator<'a> {
    params: &'a Parameters,
    env: Environment,
    tissues: TissueModel,
    ox_tox: OxTox,
    run_time: Time,
    first_deco_depth: Option<Depth>,
}

impl<'a> Annotator<'a> {
    fn new(params: &'a Parameters, initial_tissues: Option<TissueModel>) -> Self {
        let env = params.environment;
        Self {
            params,
            env,
            tissues: initial_tissues.unwrap_or_else(|| TissueModel::surface(&env)),
            ox_tox: OxTox::default(),
            run_time: Time::zero(),
            first_deco_depth: None,
        }
    }

    fn segment_load(&self, leg: &Leg) -> SegmentLoad {
        match leg.setpoint {
            Some(setpoint) => {
                let start = leg
                    .gas
                    .loop_inspired_pressures(setpoint, leg.start_depth, &self.env);
                let end = leg
                    .gas
                    .loop_inspired_pressures(setpoint, leg.end_depth, &self.env);
                SegmentLoad {
                    n2_start: start.n2,
                    n2_end: end.n2,
                    he_start: start.he,
                    he_end: end.he,
                    time: leg.time,
                }
            }
            None => {
                let start = leg.gas.inspired_partial_pressures(leg.start_depth, &self.env);
                let end = leg.gas.inspired_partial_pressures(leg.end_depth, &self.env);
                SegmentLoad {
                    n2_start: start.n2,
                    n2_end: end.n2,
                    he_start: start.he,
                    he_end: end.he,
                    time: leg.time,
                }
            }
        }
    }

    fn inspired_ppo2(&self, leg: &Leg, depth: Depth) -> Pressure {
        match leg.setpoint {
            Some(setpoint) => leg.gas.loop_inspired_pressures(setpoint, depth, &self.env).o2,
            None => leg.gas.inspired_partial_pressures(depth, &self.env).o2,
        }
    }

    /// The mix actually breathed at a depth: the gas itself on open
    /// circuit, the setpoint-adjusted loop content on the loop.
    fn breathed_mix(&self, leg: &Leg, depth: Depth) -> Gas {
        let Some(setpoint) = leg.setpoint else {
            return leg.gas;
        };
        let pp = leg.gas.loop_inspired_pressures(setpoint, depth, &self.env);
        let total = pp.o2 + pp.n2 + pp.he;
        if total <= 0. {
            return leg.gas;
        }
        Gas::new(
            (pp.o2 / total * 100.).clamp(0., 100.),
            (pp.he / total * 100.).clamp(0., 100.),
            leg.gas.gas_type(),
        )
        .unwrap_or(leg.gas)
    }

    fn annotate(&mut self, leg: &Leg) -> DiveStep {
        let params = self.params;
        let env = self.env;

        self.tissues.load(&self.segment_load(leg));
        self.run_time += leg.time;

        let max_depth = leg.start_depth.max(leg.end_depth);
        let mean_depth = (leg.start_depth + leg.end_depth) / 2.;
        let p_amb_max = env.pressure_at_depth(max_depth);
        let p_amb_mean = env.pressure_at_depth(mean_depth);

        let ppo2_max = self.inspired_ppo2(leg, max_depth);
        let ppo2_mean = self.inspired_ppo2(leg, mean_depth);
        let at_surface = leg.start_depth == Depth::zero() && leg.end_depth == Depth::zero();
        self.ox_tox.register_segment(ppo2_mean, leg.time, at_surface);

        let breathed = self.breathed_mix(leg, max_depth);
        let gas_density = breathed.density_at(max_depth, &env);
        let end_with_o2 = breathed.equivalent_narcotic_depth(max_depth, true, &env);
        let end_without_o2 = breathed.equivalent_narcotic_depth(max_depth, false, &env);

        let consumes = leg.mode != DiveMode::CC;
        let sac_rate = match leg.phase {
            DivePhase::Descent | DivePhase::Bottom => params.sac_bottom,
            _ => params.sac_deco,
        };
        let amb_consumption = if consumes { sac_rate * p_amb_mean } else { 0. };
        let step_consumption = amb_consumption * leg.time.as_minutes();

        let ppo2_limit = match leg.phase {
            DivePhase::Descent | DivePhase::Bottom => params.max_ppo2_bottom,
            _ => params.max_ppo2_deco,
        };
        let end = if params.o2_narcotic {
            end_with_o2
        } else {
            end_without_o2
        };
        let warnings = StepWarnings {
            ppo2_exceeded: ppo2_max > ppo2_limit + DEPTH_EPSILON,
            density_exceeded: gas_density > params.warning_density,
            end_exceeded: end > params.end_limit + Depth::from_meters(DEPTH_EPSILON),
        };

        let supersaturation = self.tissues.supersaturation(leg.end_depth, &env);
        let cns_single = self.ox_tox.cns();
        let cns_multiple =
            OxTox::decayed_cns(params.residual_cns, params.surface_interval) + cns_single;

        self.update_first_deco();

        DiveStep {
            phase: leg.phase,
            mode: leg.mode,
            start_depth: leg.start_depth,
            end_depth: leg.end_depth,
            time: leg.time,
            run_time: self.run_time,
            gas: leg.gas,
            setpoint: leg.setpoint,
            p_amb_max,
            ppo2_max,
            gf: supersaturation.gf_now,
            gf_surface: supersaturation.gf_surface,
            sac_rate,
            amb_consumption,
            step_consumption,
            gas_density,
            end_without_o2,
            end_with_o2,
            cns_single,
            cns_multiple,
            otu_total: self.ox_tox.otu(),
            tissue_loads: self.tissues.tissue_loads(),
            warnings,
        }
    }

    /// Latches the depth of the first required deco stop; frozen once set.
    fn update_first_deco(&mut self) {
        if self.first_deco_depth.is_some() {
            return;
        }
        let (gf_low, _) = self.params.gf;
        let ceiling = self.tissues.ceiling(gf_low as f64 / 100., &self.env);
        if ceiling > Depth::zero() {
            self.first_deco_depth = Some(round_to_stop(ceiling, self.params.stop_interval));
        }
    }
}

/// Drives the profile state machine:
/// Descent -> Bottom -> StopSteps* -> AscentLoop -> Surface.
struct ProfileBuilder<'a> {
    plan: &'a DivePlan,
    params: Parameters,
    env: Environment,
    annotator: Annotator<'a>,
    steps: Vec<DiveStep>,
    warnings: Vec<PlanWarning>,
    mode_now: DiveMode,
    gas: Gas,
    current_depth: Depth,
    extension_pending: Time,
}

impl<'a> ProfileBuilder<'a> {
    fn start(plan: &'a DivePlan) -> Result<Self, PlanError> {
        let params = plan.params;
        let env = params.environment;
        let closed = matches!(plan.mode, DiveMode::CC | DiveMode::Bailout);
        let mode_now = if closed { DiveMode::CC } else { DiveMode::OC };

        let gas = match mode_now {
            DiveMode::CC => plan
                .gas_list
                .select_diluent(plan.target_depth, &params, &env),
            _ => plan.gas_list.select_bottom(plan.target_depth, &params, &env),
        }
        .ok_or(PlanError::NoGasForDepth {
            depth: plan.target_depth,
        })?;

        let mut warnings = vec![];
        if closed && plan.set_points.is_empty() {
            warnings.push(PlanWarning::NoSetpointConfigured);
        }

        Ok(Self {
            plan,
            params,
            env,
            annotator: Annotator::new(&plan.params, plan.initial_tissues.clone()),
            steps: vec![],
            warnings,
            mode_now,
            gas,
            current_depth: Depth::zero(),
            extension_pending: plan.first_stop_extension,
        })
    }

    fn finish(self) -> (Vec<DiveStep>, Option<Depth>, Vec<PlanWarning>) {
        (self.steps, self.annotator.first_deco_depth, self.warnings)
    }

    fn run(&mut self) -> Result<(), PlanError> {
        self.descent_and_bottom();
        self.user_stop_steps()?;
        self.ascent_loop()?;
        self.emit(DivePhase::Surface, Depth::zero(), Time::zero());
        Ok(())
    }

    fn setpoint_for(&self, max_depth: Depth) -> Option<Pressure> {
        match self.mode_now {
            DiveMode::CC => Some(self.plan.set_points.effective_setpoint(
                max_depth,
                self.plan.gf_boosted,
                &self.params,
            )),
            _ => None,
        }
    }

    fn emit(&mut self, phase: DivePhase, end_depth: Depth, time: Time) {
        let leg = Leg {
            phase,
            mode: self.mode_now,
            start_depth: self.current_depth,
            end_depth,
            time,
            gas: self.gas,
            setpoint: self.setpoint_for(self.current_depth.max(end_depth)),
        };
        self.steps.push(self.annotator.annotate(&leg));
        self.current_depth = end_depth;
    }

    fn descent_and_bottom(&mut self) {
        let target = self.plan.target_depth;
        let descent_time = Time::from_minutes(target.as_meters() / self.params.descent_rate);
        self.emit(DivePhase::Descent, target, descent_time);

        // bottom time is run time at the end of the bottom segment
        let mut bottom = self.plan.bottom_time - descent_time;
        if bottom < Time::zero() {
            bottom = Time::zero();
        }
        self.emit(DivePhase::Bottom, target, bottom);
    }

    fn user_stop_steps(&mut self) -> Result<(), PlanError> {
        for stop in self.plan.stop_steps.effective_below(self.plan.target_depth) {
            if stop.depth >= self.current_depth {
                continue;
            }
            self.boundary_updates()?;
            let travel =
                (self.current_depth - stop.depth).as_meters() / self.params.ascent_rate;
            self.emit(DivePhase::Ascent, stop.depth, Time::from_minutes(travel));

            self.boundary_updates()?;
            let mut hold = stop.time;
            if !self.extension_pending.is_zero() {
                hold += self.extension_pending;
                self.extension_pending = Time::zero();
            }
            self.emit(DivePhase::Stop, stop.depth, hold);
        }
        Ok(())
    }

    fn ascent_loop(&mut self) -> Result<(), PlanError> {
        while self.current_depth > Depth::zero() {
            self.boundary_updates()?;

            let next_stop = next_stop_depth(self.current_depth, self.params.stop_interval);
            let gf_next = gf_at(next_stop, self.annotator.first_deco_depth, self.params.gf);
            let ceiling = self.annotator.tissues.ceiling(gf_next, &self.env);

            if ceiling.as_meters() > next_stop.as_meters() + DEPTH_EPSILON {
                self.deco_stop(next_stop, gf_next)?;
            } else {
                let travel =
                    (self.current_depth - next_stop).as_meters() / self.params.ascent_rate;
                self.emit(DivePhase::Ascent, next_stop, Time::from_minutes(travel));
            }
        }
        Ok(())
    }

    /// Holds at the current depth for the minimum whole-minute duration
    /// that clears the next stop, in 1-minute trial increments.
    fn deco_stop(&mut self, next_stop: Depth, gf_next: f64) -> Result<(), PlanError> {
        let depth = self.current_depth;
        let minute = Leg {
            phase: DivePhase::DecoStop,
            mode: self.mode_now,
            start_depth: depth,
            end_depth: depth,
            time: Time::from_minutes(1.),
            gas: self.gas,
            setpoint: self.setpoint_for(depth),
        };
        let load = self.annotator.segment_load(&minute);

        let mut sim = self.annotator.tissues.clone();
        let mut held_minutes: u32 = 0;
        loop {
            if held_minutes >= self.params.max_stop_minutes {
                // the violating stop still lands in the profile
                self.emit(
                    DivePhase::DecoStop,
                    depth,
                    Time::from_minutes(held_minutes as f64),
                );
                return Err(PlanError::Unplannable {
                    depth,
                    max_stop_minutes: self.params.max_stop_minutes,
                    tissue_loads: sim.tissue_loads(),
                });
            }
            sim.load(&load);
            held_minutes += 1;
            let cleared =
                sim.ceiling(gf_next, &self.env).as_meters() <= next_stop.as_meters() + DEPTH_EPSILON;
            if cleared {
                break;
            }
        }

        let mut hold = Time::from_minutes(held_minutes as f64);
        if !self.extension_pending.is_zero() {
            hold += self.extension_pending;
            self.extension_pending = Time::zero();
        }
        self.emit(DivePhase::DecoStop, depth, hold);
        Ok(())
    }

    /// Per-boundary mode, gas and setpoint reconsideration. Runs on entry
    /// to every post-bottom segment.
    fn boundary_updates(&mut self) -> Result<(), PlanError> {
        self.maybe_engage_bailout()?;
        self.maybe_switch_gas();
        Ok(())
    }

    fn maybe_engage_bailout(&mut self) -> Result<(), PlanError> {
        if self.plan.mode != DiveMode::Bailout || self.mode_now != DiveMode::CC {
            return Ok(());
        }
        let threshold = self.plan.bailout_at.unwrap_or(self.plan.target_depth);
        if self.current_depth > threshold {
            return Ok(());
        }
        self.mode_now = DiveMode::Bailout;
        self.gas = self
            .plan
            .gas_list
            .select_deco(self.current_depth, &self.params, &self.env)
            .ok_or(PlanError::NoGasForDepth {
                depth: self.current_depth,
            })?;
        Ok(())
    }

    fn maybe_switch_gas(&mut self) {
        if self.mode_now == DiveMode::CC {
            return;
        }
        if let Some(candidate) =
            self.plan
                .gas_list
                .select_deco(self.current_depth, &self.params, &self.env)
        {
            if candidate != self.gas && candidate.o2_pct() > self.gas.o2_pct() {
                self.gas = candidate;
            }
        }
    }
}

/// Rounds a ceiling up to the bottom of its stop window.
fn round_to_stop(depth: Depth, interval: Depth) -> Depth {
    let window = interval.as_meters();
    Depth::from_meters(window * (depth.as_meters() / window).ceil())
}

/// The next shallower stop-grid depth strictly above `depth`.
fn next_stop_depth(depth: Depth, interval: Depth) -> Depth {
    let window = interval.as_meters();
    let grid_steps = (depth.as_meters() / window - DEPTH_EPSILON).ceil() - 1.;
    Depth::from_meters((grid_steps * window).max(0.))
}
