use crate::common::depth::Depth;
use crate::common::environment::{Environment, AIR_N2_FRACTION, ALVEOLI_WATER_VAPOR_PRESSURE};
use crate::common::error::PlanError;
use crate::common::global_types::{GasStatus, GasType, Pressure};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A breathing gas mix, held as O2 and He percentages with N2 the remainder.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gas {
    o2_pct: f64,
    he_pct: f64,
    gas_type: GasType,
    status: GasStatus,
}

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartialPressures {
    pub o2: Pressure,
    pub n2: Pressure,
    pub he: Pressure,
}

impl core::fmt::Display for Gas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.0}/{:.0}", self.o2_pct, self.he_pct)
    }
}

impl Gas {
    /// init new gas with percentages (eg. 21, 0 for air)
    pub fn new(o2_pct: f64, he_pct: f64, gas_type: GasType) -> Result<Self, PlanError> {
        if !(0. ..=100.).contains(&o2_pct) {
            return Err(PlanError::InvalidGasMix {
                reason: "O2 percentage outside 0-100",
            });
        }
        if !(0. ..=100.).contains(&he_pct) {
            return Err(PlanError::InvalidGasMix {
                reason: "He percentage outside 0-100",
            });
        }
        if (o2_pct + he_pct) > 100. {
            return Err(PlanError::InvalidGasMix {
                reason: "O2 and He can't exceed 100% in total",
            });
        }

        Ok(Self {
            o2_pct,
            he_pct,
            gas_type,
            status: GasStatus::Active,
        })
    }

    pub fn air() -> Self {
        Self {
            o2_pct: 21.,
            he_pct: 0.,
            gas_type: GasType::Bottom,
            status: GasStatus::Active,
        }
    }

    pub fn with_status(mut self, status: GasStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_type(mut self, gas_type: GasType) -> Self {
        self.gas_type = gas_type;
        self
    }

    pub fn o2_pct(&self) -> f64 {
        self.o2_pct
    }

    pub fn he_pct(&self) -> f64 {
        self.he_pct
    }

    pub fn n2_pct(&self) -> f64 {
        100. - self.o2_pct - self.he_pct
    }

    pub fn o2_fraction(&self) -> f64 {
        self.o2_pct / 100.
    }

    pub fn he_fraction(&self) -> f64 {
        self.he_pct / 100.
    }

    pub fn n2_fraction(&self) -> f64 {
        self.n2_pct() / 100.
    }

    pub fn gas_type(&self) -> GasType {
        self.gas_type
    }

    pub fn status(&self) -> GasStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GasStatus) {
        self.status = status;
    }

    pub fn is_active(&self) -> bool {
        self.status == GasStatus::Active
    }

    /// mix id in the O2/He convention ("21/35")
    pub fn id(&self) -> String {
        format!("{:.0}/{:.0}", self.o2_pct, self.he_pct)
    }

    /// gas partial pressures at ambient pressure
    pub fn partial_pressures(&self, depth: Depth, env: &Environment) -> PartialPressures {
        self.gas_pressures_compound(env.pressure_at_depth(depth))
    }

    /// gas partial pressures in alveoli taking into account alveolar water vapor pressure
    pub fn inspired_partial_pressures(&self, depth: Depth, env: &Environment) -> PartialPressures {
        self.gas_pressures_compound(env.pressure_at_depth(depth) - ALVEOLI_WATER_VAPOR_PRESSURE)
    }

    pub fn gas_pressures_compound(&self, gas_pressure: Pressure) -> PartialPressures {
        PartialPressures {
            o2: self.o2_fraction() * gas_pressure,
            n2: self.n2_fraction() * gas_pressure,
            he: self.he_fraction() * gas_pressure,
        }
    }

    /// Inspired pressures on a closed loop with this gas as diluent.
    ///
    /// PpO2 is held at the setpoint but can't exceed what the diluent
    /// delivers at depth; the inert remainder splits by the diluent's
    /// N2:He ratio.
    pub fn loop_inspired_pressures(
        &self,
        setpoint: Pressure,
        depth: Depth,
        env: &Environment,
    ) -> PartialPressures {
        let inspired_total = env.pressure_at_depth(depth) - ALVEOLI_WATER_VAPOR_PRESSURE;
        let o2 = setpoint.min(self.o2_fraction() * inspired_total);
        let inert = (inspired_total - o2).max(0.);
        let dil_inert = self.n2_fraction() + self.he_fraction();
        if dil_inert <= 0. {
            return PartialPressures { o2, n2: 0., he: 0. };
        }
        PartialPressures {
            o2,
            n2: inert * self.n2_fraction() / dil_inert,
            he: inert * self.he_fraction() / dil_inert,
        }
    }

    pub fn surface_ppo2(&self, env: &Environment) -> Pressure {
        self.o2_fraction() * env.surface_pressure_bar()
    }

    /// MOD
    pub fn max_operating_depth(&self, ppo2_limit: Pressure, env: &Environment) -> Depth {
        if self.o2_fraction() <= 0. {
            return Depth::from_meters(f64::INFINITY);
        }
        env.depth_at_pressure(ppo2_limit / self.o2_fraction())
    }

    /// END under the configured narcotic convention.
    ///
    /// With oxygen counted narcotic only helium dilutes the narcotic load;
    /// otherwise nitrogen alone is compared against air.
    pub fn equivalent_narcotic_depth(
        &self,
        depth: Depth,
        o2_narcotic: bool,
        env: &Environment,
    ) -> Depth {
        let p_amb = env.pressure_at_depth(depth);
        let narcotic_pressure = if o2_narcotic {
            p_amb * (1. - self.he_fraction())
        } else {
            p_amb * self.n2_fraction() / AIR_N2_FRACTION
        };
        let end = env.depth_at_pressure(narcotic_pressure);
        end.max(Depth::zero())
    }

    /// mix density at depth in grams per liter
    pub fn density_at(&self, depth: Depth, env: &Environment) -> f64 {
        env.gas_density(
            self.o2_fraction(),
            self.he_fraction(),
            self.n2_fraction(),
            depth,
        )
    }
}
