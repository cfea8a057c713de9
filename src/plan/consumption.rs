use crate::common::{Gas, Parameters, Pressure};
use crate::plan::dive_step::DiveStep;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consumption roll-up for one gas across the profile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasUsage {
    pub gas: Gas,
    /// surface-equivalent liters breathed
    pub liters: f64,
    /// liters after the reserve multiplier
    pub liters_with_reserve: f64,
    /// estimated remaining pressure in the configured tanks after the dive;
    /// negative means the configuration doesn't carry enough gas
    pub end_pressure: Pressure,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsumptionSummary {
    pub usages: Vec<GasUsage>,
    pub total_liters: f64,
}

/// Groups step consumption by breathed gas, in order of first use.
pub fn summarize(steps: &[DiveStep], params: &Parameters) -> ConsumptionSummary {
    let mut usages: Vec<GasUsage> = Vec::new();
    let mut total_liters = 0.;

    for step in steps {
        if step.step_consumption <= 0. {
            continue;
        }
        total_liters += step.step_consumption;
        match usages.iter_mut().find(|u| u.gas == step.gas) {
            Some(usage) => usage.liters += step.step_consumption,
            None => usages.push(GasUsage {
                gas: step.gas,
                liters: step.step_consumption,
                liters_with_reserve: 0.,
                end_pressure: 0.,
            }),
        }
    }

    let tank_capacity = params.tank_count as f64 * params.tank_volume;
    for usage in usages.iter_mut() {
        usage.liters_with_reserve = usage.liters * params.reserve_multiplier;
        usage.end_pressure = params.fill_pressure - usage.liters_with_reserve / tank_capacity;
    }

    ConsumptionSummary {
        usages,
        total_liters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Depth, DiveMode, DivePhase, Time};
    use crate::plan::dive_step::StepWarnings;

    fn step(gas: Gas, liters: f64) -> DiveStep {
        DiveStep {
            phase: DivePhase::Bottom,
            mode: DiveMode::OC,
            start_depth: Depth::from_meters(20.),
            end_depth: Depth::from_meters(20.),
            time: Time::from_minutes(1.),
            run_time: Time::from_minutes(1.),
            gas,
            setpoint: None,
            p_amb_max: 3.,
            ppo2_max: 0.63,
            gf: 0.,
            gf_surface: 0.,
            sac_rate: 20.,
            amb_consumption: liters,
            step_consumption: liters,
            gas_density: 3.9,
            end_without_o2: Depth::from_meters(20.),
            end_with_o2: Depth::from_meters(20.),
            cns_single: 0.,
            cns_multiple: 0.,
            otu_total: 0.,
            tissue_loads: vec![],
            warnings: StepWarnings::default(),
        }
    }

    #[test]
    fn test_groups_by_gas() {
        let air = Gas::air();
        let ean50 = Gas::new(50., 0., crate::common::GasType::Deco).unwrap();
        let steps = vec![step(air, 100.), step(ean50, 50.), step(air, 20.)];
        let summary = summarize(&steps, &Parameters::default());
        assert_eq!(summary.usages.len(), 2);
        assert_eq!(summary.usages[0].gas, air);
        assert_eq!(summary.usages[0].liters, 120.);
        assert_eq!(summary.usages[1].liters, 50.);
        assert_eq!(summary.total_liters, 170.);
    }

    #[test]
    fn test_reserve_and_end_pressure() {
        let params = Parameters::default().with_tanks(1, 12., 200., 1.5);
        let steps = vec![step(Gas::air(), 1200.)];
        let summary = summarize(&steps, &params);
        let usage = &summary.usages[0];
        assert_eq!(usage.liters_with_reserve, 1800.);
        // 1800 L out of a 12 L tank is 150 bar
        assert_eq!(usage.end_pressure, 50.);
    }

    #[test]
    fn test_zero_consumption_steps_ignored() {
        let steps = vec![step(Gas::air(), 0.)];
        let summary = summarize(&steps, &Parameters::default());
        assert!(summary.usages.is_empty());
        assert_eq!(summary.total_liters, 0.);
    }
}
