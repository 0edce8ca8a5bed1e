//! Corporate Tax Engine - multi-year corporate income tax liability
//!
//! This library provides:
//! - Revenue and deduction aggregation with policy haircuts
//! - Earnings-based interest deduction limits with carryforward
//! - AMT liability and minimum tax credit stock simulation
//! - Final liability assembly over a budget window
//! - Baseline versus reform comparisons and debt feedback iteration

pub mod error;
pub mod series;
pub mod params;
pub mod inputs;
pub mod external;
pub mod taxreturn;
pub mod scenario;
pub mod config;

// Re-export commonly used types
pub use error::{TaxError, TaxResult};
pub use series::{BudgetWindow, YearSeries};
pub use params::{AmtCalibration, PolicyParams, Reform};
pub use external::{DebtModel, DebtOutput, DepreciationOutput, ForeignOutput};
pub use inputs::{Credits, Deductions, Revenues};
pub use taxreturn::{Column, CombinedReturn, CorpTaxReturn, ReturnInputs};
pub use scenario::{ScenarioRunner, solve_with_debt_feedback, FeedbackSettings};
pub use config::ScenarioConfig;
