use crate::common::{Cns, Depth, DiveMode, DivePhase, Gas, Otu, Pressure, SacRate, Time};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Limit breaches highlighted on a step. The step itself stays in the
/// profile; the flags are the warning highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepWarnings {
    pub ppo2_exceeded: bool,
    pub density_exceeded: bool,
    pub end_exceeded: bool,
}

impl StepWarnings {
    pub fn any(&self) -> bool {
        self.ppo2_exceeded || self.density_exceeded || self.end_exceeded
    }
}

/// One row of the computed profile with every derived physiological field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiveStep {
    pub phase: DivePhase,
    pub mode: DiveMode,
    pub start_depth: Depth,
    pub end_depth: Depth,
    pub time: Time,
    pub run_time: Time,
    pub gas: Gas,
    /// PpO2 target on the loop; None on open circuit.
    pub setpoint: Option<Pressure>,
    pub p_amb_max: Pressure,
    pub ppo2_max: Pressure,
    /// supersaturation at the end of the step, in GF percent
    pub gf: f64,
    /// supersaturation toward the surface at the end of the step
    pub gf_surface: f64,
    pub sac_rate: SacRate,
    /// liters per minute at ambient pressure
    pub amb_consumption: f64,
    /// liters consumed over the whole step
    pub step_consumption: f64,
    /// breathed mix density at the deepest point, grams per liter
    pub gas_density: f64,
    pub end_without_o2: Depth,
    pub end_with_o2: Depth,
    pub cns_single: Cns,
    pub cns_multiple: Cns,
    pub otu_total: Otu,
    /// (pN2, pHe) per compartment at the end of the step
    pub tissue_loads: Vec<(Pressure, Pressure)>,
    pub warnings: StepWarnings,
}

impl DiveStep {
    pub fn o2_pct(&self) -> f64 {
        self.gas.o2_pct()
    }

    pub fn n2_pct(&self) -> f64 {
        self.gas.n2_pct()
    }

    pub fn he_pct(&self) -> f64 {
        self.gas.he_pct()
    }

    pub fn max_depth(&self) -> Depth {
        self.start_depth.max(self.end_depth)
    }

    pub fn mean_depth(&self) -> Depth {
        (self.start_depth + self.end_depth) / 2.
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.phase, DivePhase::Stop | DivePhase::DecoStop)
    }
}

impl core::fmt::Display for DiveStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:<8} {:>5.1}m -> {:>5.1}m  {:>5.1} min  run {:>6.1}  {}",
            format!("{:?}", self.phase),
            self.start_depth.as_meters(),
            self.end_depth.as_meters(),
            self.time.as_minutes(),
            self.run_time.as_minutes(),
            self.gas
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_any() {
        let mut warnings = StepWarnings::default();
        assert!(!warnings.any());
        warnings.density_exceeded = true;
        assert!(warnings.any());
    }
}
