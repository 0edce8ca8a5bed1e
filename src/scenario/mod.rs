//! Policy scenarios built on top of a single corporate return
//!
//! - [`ScenarioRunner`]: the same inputs under a baseline and a reform policy
//! - [`solve_with_debt_feedback`]: re-run a return until the debt model and
//!   the interest limitation agree on the deductible share of interest

mod runner;
mod feedback;

pub use runner::{ScenarioRunner, RevenueComparison, RevenueChangeRow};
pub use feedback::{solve_with_debt_feedback, FeedbackSettings, FeedbackOutcome};
