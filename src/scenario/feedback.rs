//! Fixed-point iteration between the interest limitation and the debt model

use crate::error::TaxResult;
use crate::external::DebtModel;
use crate::series::YearSeries;
use crate::taxreturn::{CorpTaxReturn, ReturnInputs};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackSettings {
    /// Number of full pipeline passes allowed (at least one always runs)
    pub max_passes: usize,
    /// Largest change in the deductible fraction treated as converged
    pub tolerance: f64,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            max_passes: 10,
            tolerance: 1e-8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackOutcome {
    pub tax_return: CorpTaxReturn,
    pub passes: usize,
    pub converged: bool,
}

/// Run the return, hand the deductible fraction to the debt model, repeat
///
/// The debt output in `inputs` is replaced by the model's first projection.
/// With a model that ignores its input, this converges on the second pass.
pub fn solve_with_debt_feedback<M: DebtModel + ?Sized>(
    mut inputs: ReturnInputs,
    model: &M,
    settings: FeedbackSettings,
) -> TaxResult<FeedbackOutcome> {
    inputs.debt = model.project(None)?;
    let mut tax_return = CorpTaxReturn::new(inputs)?;
    tax_return.calc_all()?;
    let mut passes = 1;

    let mut previous: YearSeries = match tax_return.frac_deductible() {
        Some(frac) => frac.clone(),
        None => return Ok(FeedbackOutcome { tax_return, passes, converged: false }),
    };

    while passes < settings.max_passes {
        let debt = model.project(Some(&previous))?;
        tax_return.update_debt(debt)?;
        tax_return.calc_all()?;
        passes += 1;

        let current = match tax_return.frac_deductible() {
            Some(frac) => frac.clone(),
            None => break,
        };
        let change = current.max_abs_diff(&previous);
        debug!("debt feedback pass {passes}: max change {change:.3e}");
        if change <= settings.tolerance {
            return Ok(FeedbackOutcome { tax_return, passes, converged: true });
        }
        previous = current;
    }

    if settings.max_passes > 1 {
        warn!(
            "debt feedback did not converge within {} passes",
            settings.max_passes
        );
    }
    Ok(FeedbackOutcome { tax_return, passes, converged: false })
}
