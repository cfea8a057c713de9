use crate::common::cns_table::{CNSCoeffRow, CNS_COEFFICIENTS};
use crate::common::global_types::{Cns, Otu, Pressure};
use crate::common::time::Time;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const CNS_ELIMINATION_HALF_TIME_MINUTES: f64 = 90.;
const CNS_LIMIT_OVER_MAX_PPO2_SECONDS: f64 = 400.;
const OTU_THRESHOLD_PPO2: Pressure = 0.5;

/// Oxygen toxicity accumulators: CNS clock and pulmonary units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OxTox {
    cns: Cns,
    otu: Otu,
}

impl OxTox {
    pub fn cns(&self) -> Cns {
        self.cns
    }

    pub fn otu(&self) -> Otu {
        self.otu
    }

    /// Residual CNS after a surface interval, decayed with the 90 minute
    /// half-time.
    pub fn decayed_cns(residual: Cns, surface_interval: Time) -> Cns {
        if surface_interval.is_zero() {
            return residual;
        }
        residual
            / 2_f64.powf(surface_interval.as_minutes() / CNS_ELIMINATION_HALF_TIME_MINUTES)
    }

    /// Accumulates a segment of exposure at a representative inspired PpO2.
    pub fn register_segment(&mut self, ppo2: Pressure, time: Time, at_surface: bool) {
        self.recalculate_cns(ppo2, time, at_surface);
        self.recalculate_otu(ppo2, time);
    }

    fn recalculate_cns(&mut self, ppo2: Pressure, time: Time, at_surface: bool) {
        // attempt to assign CNS coefficients by o2 partial pressure
        if let Some((.., slope, intercept)) = self.assign_cns_coeffs(ppo2) {
            // time limit for given PO2
            let t_lim = (slope as f64) * ppo2 + (intercept as f64);
            self.cns += (time.as_minutes() / t_lim) * 100.;
        } else if at_surface && ppo2 <= 0.5 {
            // eliminate CNS with half time
            self.cns /=
                2_f64.powf(time.as_minutes() / CNS_ELIMINATION_HALF_TIME_MINUTES);
        } else if ppo2 > 1.6 {
            // increase CNS by a constant when PpO2 higher than 1.6
            self.cns += (time.as_seconds() / CNS_LIMIT_OVER_MAX_PPO2_SECONDS) * 100.;
        }
    }

    // Harlan-Hamilton pulmonary dose
    fn recalculate_otu(&mut self, ppo2: Pressure, time: Time) {
        if ppo2 <= OTU_THRESHOLD_PPO2 {
            return;
        }
        self.otu +=
            time.as_minutes() * ((ppo2 - OTU_THRESHOLD_PPO2) / OTU_THRESHOLD_PPO2).powf(0.83);
    }

    // find CNS coefficients by o2 partial pressure
    fn assign_cns_coeffs(&self, ppo2: Pressure) -> Option<CNSCoeffRow> {
        for row in CNS_COEFFICIENTS.into_iter() {
            let row_range = row.0.clone();
            let in_range_start_exclusive = (&ppo2 != row_range.start()) && row_range.contains(&ppo2);
            if in_range_start_exclusive {
                return Some(row);
            }
        }
        None
    }
}
