//! Error taxonomy for the tax engine

use thiserror::Error;

/// Errors raised while building or running a tax return
#[derive(Debug, Error)]
pub enum TaxError {
    #[error("Series '{name}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Combined return column '{0}' has not been computed yet")]
    MissingColumn(&'static str),

    #[error("Table '{name}' expected year {expected}, found {found}")]
    YearMismatch {
        name: String,
        expected: u32,
        found: u32,
    },

    #[error("Unknown policy parameter: {0}")]
    UnknownParameter(String),

    #[error("Reform year {year} is outside the budget window {start}-{end}")]
    YearOutsideWindow { year: u32, start: u32, end: u32 },

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid AMT calibration: {0}")]
    InvalidCalibration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TaxResult<T> = Result<T, TaxError>;
