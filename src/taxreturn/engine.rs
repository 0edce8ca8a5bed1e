//! Corporate tax return: runs the pipeline stages in order over the window

use super::aggregator::{aggregate, AggregatedItems};
use super::amt::{simulate_amt, AmtOutcome};
use super::combined::{Column, CombinedReturn};
use super::interest::{limit_interest, InterestDeduction};
use super::liability::final_liability;
use super::taxable::compute_taxable_income;
use crate::error::TaxResult;
use crate::external::{DebtOutput, DepreciationOutput, ForeignOutput};
use crate::inputs::{Credits, Deductions, Revenues};
use crate::params::{AmtCalibration, PolicyParams};
use crate::series::{BudgetWindow, YearSeries};
use log::{debug, info};

/// Everything a return needs, aligned on `params.window`
#[derive(Debug, Clone)]
pub struct ReturnInputs {
    pub params: PolicyParams,
    pub calibration: AmtCalibration,
    pub revenues: Revenues,
    pub deductions: Deductions,
    pub credits: Credits,
    pub depreciation: DepreciationOutput,
    pub debt: DebtOutput,
    pub foreign: ForeignOutput,
}

impl ReturnInputs {
    /// Fail before any computation if a series is missing a year
    pub fn check(&self) -> TaxResult<()> {
        let window = self.params.window;
        self.params.validate()?;
        window.check("rescale", &self.calibration.rescale)?;
        self.calibration.validate()?;
        self.revenues.check(&window)?;
        self.deductions.check(&window)?;
        self.credits.check(&window)?;
        self.depreciation.check(&window)?;
        self.debt.check(&window)?;
        self.foreign.check(&window)
    }
}

/// Corporate income tax return over a budget window
///
/// Stages run in a fixed order: interest deduction, taxable income, foreign
/// tax credit, AMT, final liability. Each stage reads only columns written by
/// earlier stages and fails with `MissingColumn` if run out of order.
#[derive(Debug, Clone)]
pub struct CorpTaxReturn {
    params: PolicyParams,
    calibration: AmtCalibration,
    items: AggregatedItems,
    credits: Credits,
    depreciation: DepreciationOutput,
    debt: DebtOutput,
    foreign: ForeignOutput,
    combined: CombinedReturn,
    interest: Option<InterestDeduction>,
    amt: Option<AmtOutcome>,
}

impl CorpTaxReturn {
    /// Validate inputs, aggregate line items and seed EBITDA and depreciation
    pub fn new(inputs: ReturnInputs) -> TaxResult<Self> {
        inputs.check()?;
        let ReturnInputs {
            params,
            calibration,
            revenues,
            deductions,
            credits,
            depreciation,
            debt,
            foreign,
        } = inputs;

        let items = aggregate(&params, &revenues, &deductions, &foreign.foreign_taxinc)?;
        let combined = CombinedReturn::new(
            params.window,
            items.ebitda.clone(),
            depreciation.tax_dep.clone(),
        )?;

        Ok(Self {
            params,
            calibration,
            items,
            credits,
            depreciation,
            debt,
            foreign,
            combined,
            interest: None,
            amt: None,
        })
    }

    pub fn window(&self) -> BudgetWindow {
        self.params.window
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    pub fn items(&self) -> &AggregatedItems {
        &self.items
    }

    pub fn depreciation(&self) -> &DepreciationOutput {
        &self.depreciation
    }

    pub fn debt(&self) -> &DebtOutput {
        &self.debt
    }

    fn invalidate(&mut self) {
        self.combined.clear_computed();
        self.interest = None;
        self.amt = None;
    }

    /// Replace the domestic part of EBITDA, keeping foreign income
    pub fn update_earnings(&mut self, domestic: YearSeries) -> TaxResult<()> {
        self.params.window.check("earnings", &domestic)?;
        let ebitda = domestic.plus(&self.foreign.foreign_taxinc);
        self.invalidate();
        self.combined.set(Column::Ebitda, ebitda)
    }

    pub fn update_depreciation(&mut self, depreciation: DepreciationOutput) -> TaxResult<()> {
        depreciation.check(&self.params.window)?;
        self.invalidate();
        self.combined.set(Column::TaxDep, depreciation.tax_dep.clone())?;
        self.depreciation = depreciation;
        Ok(())
    }

    pub fn update_debt(&mut self, debt: DebtOutput) -> TaxResult<()> {
        debt.check(&self.params.window)?;
        self.invalidate();
        self.debt = debt;
        Ok(())
    }

    /// Interest limitation; writes `nid`
    pub fn calc_interest_deduction(&mut self) -> TaxResult<()> {
        let ebitda = self.combined.require(Column::Ebitda)?;
        let tax_dep = self.combined.require(Column::TaxDep)?;
        let deduction = limit_interest(
            &self.params,
            ebitda,
            tax_dep,
            &self.items.revenues.capgains,
            &self.items.deductions.amortization,
            &self.items.deductions.depletion,
            &self.debt,
        )?;
        self.combined.set(Column::Nid, deduction.nid.clone())?;
        self.interest = Some(deduction);
        debug!("interest deduction computed");
        Ok(())
    }

    /// Taxable income and tax before credits; writes `sec199`, `taxinc`,
    /// `tau` and `taxbc`
    pub fn calc_initial_tax(&mut self) -> TaxResult<()> {
        let taxable = compute_taxable_income(
            &self.params,
            self.combined.require(Column::Ebitda)?,
            self.combined.require(Column::TaxDep)?,
            self.combined.require(Column::Nid)?,
            &self.items.deductions.sec199share,
        )?;
        self.combined.set(Column::Sec199, taxable.sec199)?;
        self.combined.set(Column::Taxinc, taxable.taxinc)?;
        self.combined.set(Column::Tau, taxable.tau)?;
        self.combined.set(Column::Taxbc, taxable.taxbc)?;
        debug!("taxable income computed");
        Ok(())
    }

    /// Foreign tax credit from the multinational model
    pub fn calc_ftc(&mut self) -> TaxResult<()> {
        self.combined.require(Column::Taxbc)?;
        self.combined.set(Column::Ftc, self.foreign.ftc.clone())
    }

    /// AMT liability and minimum tax credit; writes `amt` and `pymtc`
    pub fn calc_amt(&mut self) -> TaxResult<()> {
        self.combined.require(Column::Ftc)?;
        let taxinc = self.combined.require(Column::Taxinc)?;
        let outcome = simulate_amt(&self.params, &self.calibration, taxinc)?;
        self.combined.set(Column::Amt, outcome.amt.clone())?;
        self.combined.set(Column::Pymtc, outcome.pymtc.clone())?;
        self.amt = Some(outcome);
        debug!("AMT simulated");
        Ok(())
    }

    /// Final liability; writes `gbc` and `taxrev`
    pub fn calc_tax(&mut self) -> TaxResult<()> {
        let taxrev = final_liability(
            &self.params.window,
            self.combined.require(Column::Taxbc)?,
            self.combined.require(Column::Amt)?,
            self.combined.require(Column::Ftc)?,
            self.combined.require(Column::Pymtc)?,
            &self.credits.gbc,
        )?;
        self.combined.set(Column::Gbc, self.credits.gbc.clone())?;
        self.combined.set(Column::Taxrev, taxrev)
    }

    /// Run every stage in order
    pub fn calc_all(&mut self) -> TaxResult<()> {
        self.calc_interest_deduction()?;
        self.calc_initial_tax()?;
        self.calc_ftc()?;
        self.calc_amt()?;
        self.calc_tax()?;

        let window = self.params.window;
        info!(
            "corporate return {}-{}: total liability {:.3}",
            window.start_year,
            window.end_year(),
            self.combined.require(Column::Taxrev)?.total()
        );
        Ok(())
    }

    /// Copy of the combined return as computed so far
    pub fn combined_return(&self) -> CombinedReturn {
        self.combined.clone()
    }

    /// Final tax liability by year
    pub fn get_tax(&self) -> TaxResult<YearSeries> {
        self.combined.require(Column::Taxrev).cloned()
    }

    /// Deductible share of interest paid, for the debt model's next pass
    pub fn frac_deductible(&self) -> Option<&YearSeries> {
        self.interest.as_ref().map(|d| &d.frac_deductible)
    }

    pub fn interest_deduction(&self) -> Option<&InterestDeduction> {
        self.interest.as_ref()
    }

    pub fn amt_outcome(&self) -> Option<&AmtOutcome> {
        self.amt.as_ref()
    }
}
