//! Outputs of the depreciation, debt and multinational models
//!
//! Those models live outside this crate. The tax return only consumes their
//! per-year series and, for the debt model, hands back the fraction of
//! interest that ended up deductible.

use crate::error::TaxResult;
use crate::series::{BudgetWindow, YearSeries};

/// Tax depreciation from the asset model
#[derive(Debug, Clone, PartialEq)]
pub struct DepreciationOutput {
    pub tax_dep: YearSeries,
}

impl DepreciationOutput {
    pub fn check(&self, window: &BudgetWindow) -> TaxResult<()> {
        window.check("depreciation.tax_dep", &self.tax_dep)
    }
}

/// Interest flows from the debt model
#[derive(Debug, Clone, PartialEq)]
pub struct DebtOutput {
    /// Taxable interest income received
    pub int_income: YearSeries,
    /// Total interest paid
    pub int_paid: YearSeries,
    /// Interest paid that is eligible for deduction before the earnings cap
    pub int_deductible: YearSeries,
    /// Municipal bond interest received
    pub muni_income: YearSeries,
}

impl DebtOutput {
    /// Debt with no interest flows at all
    pub fn zeros(len: usize) -> Self {
        Self {
            int_income: YearSeries::zeros(len),
            int_paid: YearSeries::zeros(len),
            int_deductible: YearSeries::zeros(len),
            muni_income: YearSeries::zeros(len),
        }
    }

    pub fn check(&self, window: &BudgetWindow) -> TaxResult<()> {
        window.check("debt.int_income", &self.int_income)?;
        window.check("debt.int_paid", &self.int_paid)?;
        window.check("debt.int_deductible", &self.int_deductible)?;
        window.check("debt.muni_income", &self.muni_income)
    }
}

/// Foreign income and credits from the multinational model
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignOutput {
    pub foreign_taxinc: YearSeries,
    pub ftc: YearSeries,
}

impl ForeignOutput {
    pub fn zeros(len: usize) -> Self {
        Self {
            foreign_taxinc: YearSeries::zeros(len),
            ftc: YearSeries::zeros(len),
        }
    }

    pub fn check(&self, window: &BudgetWindow) -> TaxResult<()> {
        window.check("foreign.foreign_taxinc", &self.foreign_taxinc)?;
        window.check("foreign.ftc", &self.ftc)
    }
}

/// A debt model that reacts to how much of its interest is deductible
///
/// `frac_deductible` is `None` on the first pass, before any return has been
/// computed, and the previous pass's fraction afterwards.
pub trait DebtModel {
    fn project(&self, frac_deductible: Option<&YearSeries>) -> TaxResult<DebtOutput>;
}

/// Fixed interest flows that ignore the feedback
impl DebtModel for DebtOutput {
    fn project(&self, _frac_deductible: Option<&YearSeries>) -> TaxResult<DebtOutput> {
        Ok(self.clone())
    }
}

impl<F> DebtModel for F
where
    F: Fn(Option<&YearSeries>) -> TaxResult<DebtOutput>,
{
    fn project(&self, frac_deductible: Option<&YearSeries>) -> TaxResult<DebtOutput> {
        self(frac_deductible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_debt_ignores_feedback() {
        let debt = DebtOutput {
            int_paid: YearSeries::constant(2, 50.0),
            ..DebtOutput::zeros(2)
        };
        let frac = YearSeries::constant(2, 0.3);
        assert_eq!(debt.project(Some(&frac)).unwrap(), debt);
        assert_eq!(debt.project(None).unwrap(), debt);
    }

    #[test]
    fn test_closure_sees_feedback() {
        let model = |frac: Option<&YearSeries>| -> TaxResult<DebtOutput> {
            let scale = frac.map(|f| f[0]).unwrap_or(1.0);
            Ok(DebtOutput {
                int_paid: YearSeries::constant(1, 100.0 * scale),
                ..DebtOutput::zeros(1)
            })
        };
        assert_eq!(model.project(None).unwrap().int_paid[0], 100.0);
        let half = YearSeries::constant(1, 0.5);
        assert_eq!(model.project(Some(&half)).unwrap().int_paid[0], 50.0);
    }

    #[test]
    fn test_check_names_offending_series() {
        let window = BudgetWindow::new(2020, 3);
        let foreign = ForeignOutput {
            ftc: YearSeries::zeros(2),
            ..ForeignOutput::zeros(3)
        };
        let err = foreign.check(&window).unwrap_err();
        assert!(err.to_string().contains("foreign.ftc"));
    }
}
