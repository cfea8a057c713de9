#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type Pressure = f64;
pub type DepthType = f64;
pub type GradientFactor = u8;
pub type GradientFactors = (u8, u8);
pub type MbarPressure = i32;
pub type RatePerMinute = f64;
pub type Cns = f64;
pub type Otu = f64;
pub type SacRate = f64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiveMode {
    OC,
    CC,
    Bailout,
}

/// Profile phase of a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DivePhase {
    Descent,
    Bottom,
    Ascent,
    Stop,
    DecoStop,
    Surface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GasType {
    Bottom,
    Deco,
    Diluent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GasStatus {
    Active,
    Inactive,
}
