mod consumption;
mod dive_step;
mod profile;
mod services;

pub use consumption::{ConsumptionSummary, GasUsage};
pub use dive_step::{DiveStep, StepWarnings};
pub use profile::DivePlan;
pub use services::CancelToken;
