use crate::common::{Depth, Environment, Gas, GradientFactors, Pressure, Time};
use crate::zhl::compartment::{Compartment, SegmentLoad, Supersaturation};
use crate::zhl::zhl_values::ZHL_16C_N2_16A_HE_VALUES;

const NDL_CUT_OFF_MINS: u8 = 99;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full ZH-L16C tissue state: 16 compartments of N2/He loads.
///
/// The model is a pure value; the profile builder clones it freely to run
/// what-if ascents without disturbing the committed state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TissueModel {
    compartments: Vec<Compartment>,
}

impl TissueModel {
    /// Tissue state after indefinite surface exposure to air.
    pub fn surface(env: &Environment) -> Self {
        let compartments = ZHL_16C_N2_16A_HE_VALUES
            .into_iter()
            .enumerate()
            .map(|(i, params)| Compartment::surface(i as u8 + 1, params, env))
            .collect();
        Self { compartments }
    }

    /// Rebuilds a model from a per-compartment (pN2, pHe) snapshot, paired
    /// with the coefficient table in order.
    pub fn from_tissue_loads(loads: &[(Pressure, Pressure)]) -> Self {
        let compartments = ZHL_16C_N2_16A_HE_VALUES
            .into_iter()
            .zip(loads.iter())
            .enumerate()
            .map(|(i, (params, &(p_n2, p_he)))| Compartment {
                no: i as u8 + 1,
                params,
                p_n2,
                p_he,
            })
            .collect();
        Self { compartments }
    }

    pub fn load(&mut self, segment: &SegmentLoad) {
        for compartment in self.compartments.iter_mut() {
            compartment.load(segment);
        }
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    /// (pN2, pHe) per compartment, deep to shallow half-times.
    pub fn tissue_loads(&self) -> Vec<(Pressure, Pressure)> {
        self.compartments
            .iter()
            .map(|c| (c.p_n2, c.p_he))
            .collect()
    }

    /// Lowest tolerable ambient pressure across compartments at a gradient
    /// factor fraction.
    pub fn ceiling_pressure(&self, gf: f64) -> Pressure {
        self.compartments
            .iter()
            .map(|c| c.min_tolerable_amb_pressure(gf))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Decompression ceiling as a depth, zero when a direct ascent is
    /// tolerated.
    pub fn ceiling(&self, gf: f64, env: &Environment) -> Depth {
        let depth = env.depth_at_pressure(self.ceiling_pressure(gf));
        depth.max(Depth::zero())
    }

    /// Remaining no-stop time at a depth on a gas, against GF high.
    ///
    /// Simulated in 1-minute increments and cut off at 99 minutes.
    pub fn no_stop_time(&self, depth: Depth, gas: &Gas, gf_high: f64, env: &Environment) -> Time {
        if self.ceiling(gf_high, env) > Depth::zero() {
            return Time::zero();
        }
        let inspired = gas.inspired_partial_pressures(depth, env);
        let minute = SegmentLoad {
            n2_start: inspired.n2,
            n2_end: inspired.n2,
            he_start: inspired.he,
            he_end: inspired.he,
            time: Time::from_minutes(1.),
        };
        let mut sim = self.clone();
        for i in 0..NDL_CUT_OFF_MINS {
            sim.load(&minute);
            if sim.ceiling(gf_high, env) > Depth::zero() {
                return Time::from_minutes(i);
            }
        }
        Time::from_minutes(NDL_CUT_OFF_MINS)
    }

    /// Highest supersaturation across compartments.
    pub fn supersaturation(&self, depth: Depth, env: &Environment) -> Supersaturation {
        let mut acc = Supersaturation::default();
        for compartment in self.compartments.iter() {
            let Supersaturation { gf_now, gf_surface } = compartment.supersaturation(depth, env);
            if gf_now > acc.gf_now {
                acc.gf_now = gf_now;
            }
            if gf_surface > acc.gf_surface {
                acc.gf_surface = gf_surface;
            }
        }
        acc
    }
}

/// Gradient factor fraction in effect at a depth: GF low at the first deco
/// stop, GF high at the surface, linear in between.
pub fn gf_at(depth: Depth, first_stop_depth: Option<Depth>, gf: GradientFactors) -> f64 {
    let (gf_low, gf_high) = gf;
    let low = gf_low as f64 / 100.;
    let high = gf_high as f64 / 100.;
    let Some(first_stop) = first_stop_depth else {
        return high;
    };
    if first_stop <= Depth::zero() {
        return high;
    }
    let slope_point = high - (high - low) * depth.as_meters() / first_stop.as_meters();
    slope_point.clamp(low, high)
}
