mod common;
mod persistence;
mod plan;
mod zhl;

pub use common::{
    CNSCoeffRow, Cns, Depth, DepthType, DiveMode, DivePhase, Environment, Gas, GasList, GasStatus,
    GasType, GradientFactor, GradientFactors, MbarPressure, Otu, OxTox, ParameterError, Parameters,
    PartialPressures, PersistenceError, PlanError, PlanWarning, Pressure, RatePerMinute, SacRate,
    SetPoint, SetPoints, StopStep, StopSteps, Time, Unit, Units, CNS_COEFFICIENTS,
};

pub use plan::{CancelToken, ConsumptionSummary, DivePlan, DiveStep, GasUsage, StepWarnings};

pub use persistence::{
    default_data_dir, load_gas_list, load_parameters, load_set_points, save_gas_list,
    save_parameters, save_set_points,
};

pub use zhl::{
    gf_at, Compartment, SegmentLoad, Supersaturation, TissueModel, ZHLParam, ZHLParams,
    ZHL_16C_N2_16A_HE_VALUES,
};
