use crate::common::{
    Depth, Environment, Pressure, Time, AIR_N2_FRACTION, ALVEOLI_WATER_VAPOR_PRESSURE,
};
use crate::zhl::zhl_values::ZHLParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const LN_2: f64 = core::f64::consts::LN_2;
// below this duration a segment is treated as instantaneous
const MIN_SEGMENT_SECONDS: f64 = 1e-9;
// below this total inert pressure the N2 coefficients apply outright
const MIN_TOTAL_INERT_PRESSURE: Pressure = 1e-9;

/// Inspired inert-gas pressures changing linearly across one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLoad {
    pub n2_start: Pressure,
    pub n2_end: Pressure,
    pub he_start: Pressure,
    pub he_end: Pressure,
    pub time: Time,
}

/// Current supersaturation as gradient-factor percentages, at depth and
/// toward the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Supersaturation {
    pub gf_now: f64,
    pub gf_surface: f64,
}

/// One ZH-L compartment tracking nitrogen and helium loads.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compartment {
    pub no: u8,
    pub params: ZHLParams,
    pub p_n2: Pressure,
    pub p_he: Pressure,
}

impl Compartment {
    /// Compartment saturated to surface air.
    pub fn surface(no: u8, params: ZHLParams, env: &Environment) -> Self {
        Self {
            no,
            params,
            p_n2: (env.surface_pressure_bar() - ALVEOLI_WATER_VAPOR_PRESSURE) * AIR_N2_FRACTION,
            p_he: 0.,
        }
    }

    /// Applies one segment of loading, each inert gas independently.
    pub fn load(&mut self, segment: &SegmentLoad) {
        let (n2_half_time, .., he_half_time, _, _) = self.params;
        self.p_n2 = schreiner(
            self.p_n2,
            segment.n2_start,
            segment.n2_end,
            segment.time,
            n2_half_time,
        );
        self.p_he = schreiner(
            self.p_he,
            segment.he_start,
            segment.he_end,
            segment.time,
            he_half_time,
        );
        debug_assert!(
            self.p_n2 >= 0. && self.p_he >= 0.,
            "negative tissue pressure in compartment {}",
            self.no
        );
    }

    pub fn total_inert_pressure(&self) -> Pressure {
        self.p_n2 + self.p_he
    }

    /// a/b coefficients weighted by the current inert-gas mix.
    pub fn weighted_zhl_params(&self) -> (Pressure, Pressure) {
        let (_, n2_a, n2_b, _, he_a, he_b) = self.params;
        let total = self.total_inert_pressure();
        if total < MIN_TOTAL_INERT_PRESSURE {
            return (n2_a, n2_b);
        }
        (
            (n2_a * self.p_n2 + he_a * self.p_he) / total,
            (n2_b * self.p_n2 + he_b * self.p_he) / total,
        )
    }

    /// Lowest ambient pressure this compartment tolerates at the given
    /// gradient factor fraction.
    pub fn min_tolerable_amb_pressure(&self, gf: f64) -> Pressure {
        let (a, b) = self.weighted_zhl_params();
        let p_total = self.total_inert_pressure();
        (p_total - gf * a) / (gf / b + 1. - gf)
    }

    /// Gradient factors consumed at depth and toward the surface.
    pub fn supersaturation(&self, depth: Depth, env: &Environment) -> Supersaturation {
        let (a, b) = self.weighted_zhl_params();
        let p_total = self.total_inert_pressure();
        let gf_against = |p_amb: Pressure| {
            let m_value = p_amb / b + a;
            let gf = (p_total - p_amb) / (m_value - p_amb) * 100.;
            gf.max(0.)
        };
        Supersaturation {
            gf_now: gf_against(env.pressure_at_depth(depth)),
            gf_surface: gf_against(env.surface_pressure_bar()),
        }
    }
}

/// Schreiner equation: tissue pressure after a linear change of the
/// inspired inert-gas pressure from `p_insp_start` to `p_insp_end`.
fn schreiner(
    p0: Pressure,
    p_insp_start: Pressure,
    p_insp_end: Pressure,
    time: Time,
    half_time: f64,
) -> Pressure {
    let t = time.as_minutes();
    if t * 60. < MIN_SEGMENT_SECONDS {
        return p0;
    }
    let k = LN_2 / half_time;
    let rate = (p_insp_end - p_insp_start) / t;
    if rate == 0. {
        // constant-pressure limiting form
        return p_insp_start + (p0 - p_insp_start) * (-k * t).exp();
    }
    p_insp_start + rate * (t - 1. / k) + (p0 - p_insp_start + rate / k) * (-k * t).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zhl::zhl_values::ZHL_16C_N2_16A_HE_VALUES;

    fn env() -> Environment {
        Environment::default()
    }

    fn fifth() -> Compartment {
        Compartment::surface(5, ZHL_16C_N2_16A_HE_VALUES[4], &env())
    }

    #[test]
    fn test_surface_saturation() {
        let cpt = fifth();
        assert!((cpt.p_n2 - (1.013 - 0.0627) * 0.79).abs() < 1e-12);
        assert_eq!(cpt.p_he, 0.);
    }

    #[test]
    fn test_flat_segment_ongassing() {
        let mut cpt = fifth();
        let inspired_n2 =
            0.79 * (env().pressure_at_depth(Depth::from_meters(30.)) - 0.0627);
        let before = cpt.p_n2;
        cpt.load(&SegmentLoad {
            n2_start: inspired_n2,
            n2_end: inspired_n2,
            he_start: 0.,
            he_end: 0.,
            time: Time::from_minutes(10.),
        });
        assert!(cpt.p_n2 > before);
        assert!(cpt.p_n2 < inspired_n2);

        // half-time of 27 min: half the gap closes in 27 min
        let mut cpt = fifth();
        let gap = inspired_n2 - cpt.p_n2;
        cpt.load(&SegmentLoad {
            n2_start: inspired_n2,
            n2_end: inspired_n2,
            he_start: 0.,
            he_end: 0.,
            time: Time::from_minutes(27.),
        });
        assert!((inspired_n2 - cpt.p_n2 - gap / 2.).abs() < 1e-9);
    }

    #[test]
    fn test_zero_time_segment_is_identity() {
        let mut cpt = fifth();
        let before = cpt;
        cpt.load(&SegmentLoad {
            n2_start: 2.,
            n2_end: 3.,
            he_start: 0.5,
            he_end: 0.5,
            time: Time::zero(),
        });
        assert_eq!(cpt, before);
    }

    #[test]
    fn test_schreiner_matches_haldane_on_flat_segment() {
        // a linear segment with equal endpoints must reduce to the
        // constant-pressure form
        let p = schreiner(0.75, 2., 2. + 1e-15, Time::from_minutes(10.), 27.);
        let flat = schreiner(0.75, 2., 2., Time::from_minutes(10.), 27.);
        assert!((p - flat).abs() < 1e-9);
    }

    #[test]
    fn test_schreiner_continuity_at_t0() {
        let p = schreiner(0.75, 2., 3., Time::from_seconds(1e-12), 27.);
        assert_eq!(p, 0.75);
    }

    #[test]
    fn test_weighted_params_guard() {
        let mut cpt = fifth();
        cpt.p_n2 = 0.;
        cpt.p_he = 0.;
        let (_, n2_a, n2_b, ..) = cpt.params;
        assert_eq!(cpt.weighted_zhl_params(), (n2_a, n2_b));
    }

    #[test]
    fn test_weighted_params_mix() {
        let mut cpt = fifth();
        cpt.p_n2 = 1.;
        cpt.p_he = 1.;
        let (_, n2_a, n2_b, _, he_a, he_b) = cpt.params;
        let (a, b) = cpt.weighted_zhl_params();
        assert!((a - (n2_a + he_a) / 2.).abs() < 1e-12);
        assert!((b - (n2_b + he_b) / 2.).abs() < 1e-12);
    }

    #[test]
    fn test_min_tolerable_pressure_rises_with_load() {
        let mut loaded = fifth();
        let inspired_n2 =
            0.79 * (env().pressure_at_depth(Depth::from_meters(40.)) - 0.0627);
        loaded.load(&SegmentLoad {
            n2_start: inspired_n2,
            n2_end: inspired_n2,
            he_start: 0.,
            he_end: 0.,
            time: Time::from_minutes(30.),
        });
        let fresh = fifth();
        assert!(
            loaded.min_tolerable_amb_pressure(0.85) > fresh.min_tolerable_amb_pressure(0.85)
        );
    }

    #[test]
    fn test_supersaturation_zero_at_saturation() {
        let cpt = fifth();
        let supersat = cpt.supersaturation(Depth::zero(), &env());
        // surface-saturated tissue holds less than ambient pressure
        assert_eq!(supersat.gf_now, 0.);
    }
}
