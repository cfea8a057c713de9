mod cns_table;
mod depth;
mod environment;
mod error;
mod gas;
mod gas_list;
mod global_types;
mod ox_tox;
mod parameters;
mod set_points;
mod stop_steps;
mod time;

pub use cns_table::{CNSCoeffRow, CNS_COEFFICIENTS};
pub use depth::{Depth, DepthType, Unit, Units};
pub use environment::{Environment, AIR_N2_FRACTION, AIR_O2_FRACTION, ALVEOLI_WATER_VAPOR_PRESSURE};
pub use error::{ParameterError, PersistenceError, PlanError, PlanWarning};
pub use gas::{Gas, PartialPressures};
pub use gas_list::GasList;
pub use global_types::{
    Cns, DiveMode, DivePhase, GasStatus, GasType, GradientFactor, GradientFactors, MbarPressure,
    Otu, Pressure, RatePerMinute, SacRate,
};
pub use ox_tox::OxTox;
pub use parameters::Parameters;
pub use set_points::{SetPoint, SetPoints};
pub use stop_steps::{StopStep, StopSteps};
pub use time::Time;
