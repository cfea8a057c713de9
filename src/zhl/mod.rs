mod compartment;
mod tissue;
mod zhl_values;

pub use compartment::{Compartment, SegmentLoad, Supersaturation};
pub use tissue::{gf_at, TissueModel};
pub use zhl_values::{ZHLParam, ZHLParams, ZHL_16C_N2_16A_HE_VALUES};
