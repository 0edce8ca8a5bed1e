//! Policy parameters, reforms and AMT calibration
//!
//! Everything in here is read-only once a computation pass starts. The only
//! value flowing the other way (the fraction of interest deductible) is
//! returned explicitly by the interest limiter instead of being written back.

pub mod policy;
pub mod reform;
pub mod calibration;

pub use policy::{ParamValue, PolicySpec, PolicyParams, PARAMETER_NAMES, UNLIMITED_INTEREST_CAP};
pub use reform::Reform;
pub use calibration::{AmtCalibration, CalibrationSpec};
