//! Corporate tax return pipeline
//!
//! Stages, in the order [`CorpTaxReturn::calc_all`] runs them:
//! - `aggregator`: line items to EBITDA (at construction)
//! - `interest`: earnings-based interest limit with carryforward
//! - `taxable`: taxable income and tax before credits
//! - foreign tax credit, copied from the multinational model
//! - `amt`: AMT liability and minimum tax credit stocks
//! - `liability`: final liability, floored at zero

pub mod aggregator;
pub mod interest;
pub mod taxable;
pub mod amt;
pub mod liability;
mod combined;
mod engine;

pub use combined::{Column, CombinedReturn, CombinedRow};
pub use engine::{CorpTaxReturn, ReturnInputs};
pub use interest::{CarryforwardState, InterestDeduction, ATI_FLOOR, INT_PAID_GUARD};
pub use amt::{AmtOutcome, AmtRegime, AmtStocks, Transition};
