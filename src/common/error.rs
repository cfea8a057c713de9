use crate::common::depth::Depth;
use crate::common::global_types::Pressure;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rejected configuration field with the reason it failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid parameter [{field}]: {reason}")]
pub struct ParameterError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ParameterError {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Errors surfaced by plan construction and the planner services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid gas mix: {reason}")]
    InvalidGasMix { reason: &'static str },

    #[error("no active gas breathable at {depth}")]
    NoGasForDepth { depth: Depth },

    #[error("ascent cannot clear the ceiling at {depth} within {max_stop_minutes} minutes")]
    Unplannable {
        depth: Depth,
        max_stop_minutes: u32,
        /// (pN2, pHe) per compartment at the point the search gave up.
        tissue_loads: Vec<(Pressure, Pressure)>,
    },

    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),

    #[error("planner service cancelled")]
    Cancelled,
}

/// Non-fatal conditions recorded on a built plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlanWarning {
    /// CC plan with an empty setpoint schedule; the diluent PpO2 ceiling
    /// from the parameters was used instead.
    NoSetpointConfigured,
}

/// Errors from the on-disk settings files. These never block a build;
/// callers fall back to seeded defaults.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unsupported settings file version {found}")]
    UnsupportedVersion { found: u32 },

    #[error("corrupt settings file: {0}")]
    Corrupt(&'static str),
}
