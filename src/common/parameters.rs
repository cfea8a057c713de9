use crate::common::depth::Depth;
use crate::common::environment::Environment;
use crate::common::error::ParameterError;
use crate::common::global_types::{
    Cns, GasType, GradientFactor, GradientFactors, Pressure, RatePerMinute, SacRate,
};
use crate::common::time::Time;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const GF_RANGE_ERR_MSG: &str = "GF values have to be in 1-100 range";
const GF_ORDER_ERR_MSG: &str = "GFLow can't be higher than GFHigh";
const SURFACE_PRESSURE_ERR_MSG: &str = "Surface pressure must be in milibars in 500-1500 range";
const RATE_ERR_MSG: &str = "Vertical rates must be in 1-30 m/min range";
const PPO2_ORDER_ERR_MSG: &str = "PpO2 limits must satisfy min < bottom <= deco";
const SAC_ERR_MSG: &str = "SAC rates must be positive";
const STOP_INTERVAL_ERR_MSG: &str = "Stop interval must be positive";
const TANK_ERR_MSG: &str = "Tank volume and fill pressure must be positive";

/// Physiological and operational planning configuration.
///
/// Read-only for the lifetime of a build; the plan snapshots it at entry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    pub gf: GradientFactors,
    pub max_ppo2_bottom: Pressure,
    pub max_ppo2_deco: Pressure,
    pub max_ppo2_diluent: Pressure,
    pub min_ppo2: Pressure,
    pub sac_bottom: SacRate,
    pub sac_deco: SacRate,
    pub warning_density: f64,
    pub end_limit: Depth,
    pub o2_narcotic: bool,
    pub ascent_rate: RatePerMinute,
    pub descent_rate: RatePerMinute,
    pub stop_interval: Depth,
    pub max_stop_minutes: u32,
    /// Extra time-to-surface the MaxTime service may spend over the
    /// original TTS before halting.
    pub tts_budget: Time,
    /// CNS carried over from a preceding dive, in percent.
    pub residual_cns: Cns,
    pub surface_interval: Time,
    pub tank_count: u32,
    pub tank_volume: f64,
    pub fill_pressure: Pressure,
    pub reserve_multiplier: f64,
    pub environment: Environment,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            gf: (30, 70),
            max_ppo2_bottom: 1.4,
            max_ppo2_deco: 1.6,
            max_ppo2_diluent: 1.4,
            min_ppo2: 0.7,
            sac_bottom: 20.,
            sac_deco: 20.,
            warning_density: 6.3,
            end_limit: Depth::from_meters(30.),
            o2_narcotic: true,
            ascent_rate: 9.,
            descent_rate: 18.,
            stop_interval: Depth::from_meters(3.),
            max_stop_minutes: 360,
            tts_budget: Time::from_minutes(1.),
            residual_cns: 0.,
            surface_interval: Time::zero(),
            tank_count: 1,
            tank_volume: 24.,
            fill_pressure: 200.,
            reserve_multiplier: 1.5,
            environment: Environment::default(),
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gradient_factors<T: Into<GradientFactor>>(mut self, gf_low: T, gf_high: T) -> Self {
        self.gf = (gf_low.into(), gf_high.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_ppo2_limits(mut self, bottom: Pressure, deco: Pressure, min: Pressure) -> Self {
        self.max_ppo2_bottom = bottom;
        self.max_ppo2_deco = deco;
        self.min_ppo2 = min;
        self
    }

    pub fn with_max_ppo2_diluent(mut self, limit: Pressure) -> Self {
        self.max_ppo2_diluent = limit;
        self
    }

    pub fn with_sac_rates(mut self, bottom: SacRate, deco: SacRate) -> Self {
        self.sac_bottom = bottom;
        self.sac_deco = deco;
        self
    }

    pub fn with_vertical_rates(mut self, ascent: RatePerMinute, descent: RatePerMinute) -> Self {
        self.ascent_rate = ascent;
        self.descent_rate = descent;
        self
    }

    pub fn with_end_limit(mut self, end_limit: Depth, o2_narcotic: bool) -> Self {
        self.end_limit = end_limit;
        self.o2_narcotic = o2_narcotic;
        self
    }

    pub fn with_stop_interval(mut self, stop_interval: Depth) -> Self {
        self.stop_interval = stop_interval;
        self
    }

    pub fn with_max_stop_minutes(mut self, max_stop_minutes: u32) -> Self {
        self.max_stop_minutes = max_stop_minutes;
        self
    }

    pub fn with_tts_budget(mut self, tts_budget: Time) -> Self {
        self.tts_budget = tts_budget;
        self
    }

    pub fn with_previous_exposure(mut self, residual_cns: Cns, surface_interval: Time) -> Self {
        self.residual_cns = residual_cns;
        self.surface_interval = surface_interval;
        self
    }

    pub fn with_tanks(
        mut self,
        count: u32,
        volume: f64,
        fill_pressure: Pressure,
        reserve_multiplier: f64,
    ) -> Self {
        self.tank_count = count;
        self.tank_volume = volume;
        self.fill_pressure = fill_pressure;
        self.reserve_multiplier = reserve_multiplier;
        self
    }

    /// MOD limit applicable to a gas of the given type.
    pub fn max_ppo2_for(&self, gas_type: GasType) -> Pressure {
        match gas_type {
            GasType::Bottom => self.max_ppo2_bottom,
            GasType::Deco => self.max_ppo2_deco,
            GasType::Diluent => self.max_ppo2_diluent,
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.validate_gradient_factors()?;
        self.validate_environment()?;
        self.validate_rates()?;
        self.validate_ppo2_limits()?;
        self.validate_consumption()?;
        Ok(())
    }

    fn validate_gradient_factors(&self) -> Result<(), ParameterError> {
        let (gf_low, gf_high) = self.gf;
        let gf_range = 1..=100;

        if !gf_range.contains(&gf_low) || !gf_range.contains(&gf_high) {
            return Err(ParameterError::new("gf", GF_RANGE_ERR_MSG));
        }

        if gf_low > gf_high {
            return Err(ParameterError::new("gf", GF_ORDER_ERR_MSG));
        }

        Ok(())
    }

    fn validate_environment(&self) -> Result<(), ParameterError> {
        let mbar_pressure_range = 500..=1500;
        if !mbar_pressure_range.contains(&self.environment.surface_pressure) {
            return Err(ParameterError::new(
                "surface_pressure",
                SURFACE_PRESSURE_ERR_MSG,
            ));
        }
        Ok(())
    }

    fn validate_rates(&self) -> Result<(), ParameterError> {
        let rate_range = 1.0..=30.0;
        if !rate_range.contains(&self.ascent_rate) || !rate_range.contains(&self.descent_rate) {
            return Err(ParameterError::new("vertical_rates", RATE_ERR_MSG));
        }
        Ok(())
    }

    fn validate_ppo2_limits(&self) -> Result<(), ParameterError> {
        if !(self.min_ppo2 < self.max_ppo2_bottom && self.max_ppo2_bottom <= self.max_ppo2_deco) {
            return Err(ParameterError::new("ppo2_limits", PPO2_ORDER_ERR_MSG));
        }
        Ok(())
    }

    fn validate_consumption(&self) -> Result<(), ParameterError> {
        if self.sac_bottom <= 0. || self.sac_deco <= 0. {
            return Err(ParameterError::new("sac", SAC_ERR_MSG));
        }
        if self.stop_interval.as_meters() <= 0. {
            return Err(ParameterError::new("stop_interval", STOP_INTERVAL_ERR_MSG));
        }
        if self.tank_volume <= 0. || self.fill_pressure <= 0. {
            return Err(ParameterError::new("tanks", TANK_ERR_MSG));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = Parameters::default();
        assert_eq!(params.validate(), Ok(()));
        assert_eq!(params.gf, (30, 70));
        assert_eq!(params.max_ppo2_bottom, 1.4);
        assert_eq!(params.max_ppo2_deco, 1.6);
        assert_eq!(params.sac_bottom, 20.);
        assert_eq!(params.end_limit, Depth::from_meters(30.));
        assert_eq!(params.ascent_rate, 9.);
        assert_eq!(params.descent_rate, 18.);
    }

    #[test]
    fn test_gf_range() {
        let invalid_gf_range_cases = vec![(1, 101), (0, 99), (120, 240)];
        for (gf_low, gf_high) in invalid_gf_range_cases {
            let params = Parameters::new().with_gradient_factors(gf_low, gf_high);
            assert_eq!(
                params.validate(),
                Err(ParameterError::new("gf", GF_RANGE_ERR_MSG))
            );
        }
    }

    #[test]
    fn test_gf_order() {
        let params = Parameters::new().with_gradient_factors(90, 80);
        assert_eq!(
            params.validate(),
            Err(ParameterError::new("gf", GF_ORDER_ERR_MSG))
        );
    }

    #[test]
    fn test_invalid_surface_pressure() {
        for mbar in [0, 100, 2000] {
            let params = Parameters::new().with_environment(Environment::new(mbar, 1020.));
            assert_eq!(
                params.validate(),
                Err(ParameterError::new(
                    "surface_pressure",
                    SURFACE_PRESSURE_ERR_MSG
                ))
            );
        }
    }

    #[test]
    fn test_invalid_rates() {
        let params = Parameters::new().with_vertical_rates(0.5, 18.);
        assert!(params.validate().is_err());
        let params = Parameters::new().with_vertical_rates(9., 31.);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_ppo2_limit_order() {
        let params = Parameters::new().with_ppo2_limits(1.6, 1.4, 0.7);
        assert_eq!(
            params.validate(),
            Err(ParameterError::new("ppo2_limits", PPO2_ORDER_ERR_MSG))
        );
    }

    #[test]
    fn test_max_ppo2_for_type() {
        let params = Parameters::default();
        assert_eq!(params.max_ppo2_for(GasType::Bottom), 1.4);
        assert_eq!(params.max_ppo2_for(GasType::Deco), 1.6);
        assert_eq!(params.max_ppo2_for(GasType::Diluent), 1.4);
    }
}
