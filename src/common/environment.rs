use crate::common::depth::Depth;
use crate::common::global_types::{MbarPressure, Pressure};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// alveolar water vapor pressure assuming 47 mm Hg at 37C (Buhlmann's value)
pub const ALVEOLI_WATER_VAPOR_PRESSURE: Pressure = 0.0627;

/// Inert fraction of nitrogen in atmospheric air.
pub const AIR_N2_FRACTION: f64 = 0.79;
pub const AIR_O2_FRACTION: f64 = 0.21;

const GRAVITY: f64 = 9.80665;
const PASCALS_PER_BAR: f64 = 100_000.;

/// Gas densities at 1 bar, 15C, in grams per liter.
const O2_DENSITY: f64 = 1.428;
const N2_DENSITY: f64 = 1.2506;
const HE_DENSITY: f64 = 0.1786;

/// Ambient conditions: atmospheric pressure and water density.
///
/// All depth <-> pressure conversions go through here so that altitude and
/// fresh/salt water configurations are applied consistently.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Environment {
    pub surface_pressure: MbarPressure,
    pub water_density: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            surface_pressure: 1013,
            water_density: 1020.,
        }
    }
}

impl Environment {
    pub fn new(surface_pressure: MbarPressure, water_density: f64) -> Self {
        Self {
            surface_pressure,
            water_density,
        }
    }

    pub fn surface_pressure_bar(&self) -> Pressure {
        self.surface_pressure as f64 / 1000.
    }

    /// Hydrostatic pressure gradient in bar per meter of water.
    pub fn bar_per_meter(&self) -> Pressure {
        self.water_density * GRAVITY / PASCALS_PER_BAR
    }

    /// Absolute ambient pressure at depth.
    pub fn pressure_at_depth(&self, depth: Depth) -> Pressure {
        self.surface_pressure_bar() + depth.as_meters() * self.bar_per_meter()
    }

    /// Depth at which the given absolute pressure is reached. Negative for
    /// pressures below surface pressure.
    pub fn depth_at_pressure(&self, pressure: Pressure) -> Depth {
        Depth::from_meters((pressure - self.surface_pressure_bar()) / self.bar_per_meter())
    }

    /// Density of a gas mix at depth in grams per liter.
    pub fn gas_density(&self, o2: f64, he: f64, n2: f64, depth: Depth) -> f64 {
        let density_at_surface = o2 * O2_DENSITY + he * HE_DENSITY + n2 * N2_DENSITY;
        density_at_surface * self.pressure_at_depth(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_environment() {
        let env = Environment::default();
        assert_eq!(env.surface_pressure_bar(), 1.013);
        assert_eq!(env.water_density, 1020.);
    }

    #[test]
    fn test_pressure_at_depth() {
        let env = Environment::default();
        let p = env.pressure_at_depth(Depth::from_meters(10.));
        // 1.013 + 10 * 1020 * 9.80665 / 1e5
        assert!((p - 2.0133).abs() < 0.001);
    }

    #[test]
    fn test_depth_pressure_roundtrip() {
        let env = Environment::default();
        for d in [0., 3., 21., 50., 120.] {
            let p = env.pressure_at_depth(Depth::from_meters(d));
            let back = env.depth_at_pressure(p);
            assert!((back.as_meters() - d).abs() < 1e-9);
        }
    }

    #[test]
    fn test_altitude_environment() {
        let env = Environment::new(900, 1000.);
        assert_eq!(env.surface_pressure_bar(), 0.9);
        let p = env.pressure_at_depth(Depth::from_meters(10.));
        assert!((p - (0.9 + 0.980665)).abs() < 1e-9);
    }

    #[test]
    fn test_air_density_at_depth() {
        let env = Environment::default();
        let density = env.gas_density(0.21, 0., 0.79, Depth::from_meters(30.));
        // roughly 4x surface air density
        assert!(density > 4.9 && density < 5.3);
    }
}
