//! Baseline versus reform comparison

use super::feedback::{solve_with_debt_feedback, FeedbackOutcome, FeedbackSettings};
use crate::error::TaxResult;
use crate::external::DebtModel;
use crate::params::PolicyParams;
use crate::taxreturn::{CombinedReturn, CorpTaxReturn, ReturnInputs};
use log::info;
use serde::Serialize;
use std::io::Write;

/// Change in corporate liability for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueChangeRow {
    pub year: u32,
    pub baseline: f64,
    pub reform: f64,
    pub change: f64,
}

#[derive(Debug, Clone)]
pub struct RevenueComparison {
    pub rows: Vec<RevenueChangeRow>,
    pub baseline: CombinedReturn,
    pub reform: CombinedReturn,
}

impl RevenueComparison {
    /// Total change over the window
    pub fn total_change(&self) -> f64 {
        self.rows.iter().map(|r| r.change).sum()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> TaxResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Runs one set of inputs under different policies
///
/// The `params` inside the template inputs are replaced on every run; all
/// other inputs are shared.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    template: ReturnInputs,
}

impl ScenarioRunner {
    pub fn new(template: ReturnInputs) -> TaxResult<Self> {
        template.check()?;
        Ok(Self { template })
    }

    fn inputs_for(&self, params: &PolicyParams) -> ReturnInputs {
        ReturnInputs {
            params: params.clone(),
            ..self.template.clone()
        }
    }

    /// A fully computed return under `params`
    pub fn run(&self, params: &PolicyParams) -> TaxResult<CorpTaxReturn> {
        let mut tax_return = CorpTaxReturn::new(self.inputs_for(params))?;
        tax_return.calc_all()?;
        Ok(tax_return)
    }

    /// A return under `params` iterated against a debt model
    pub fn run_with_feedback<M: DebtModel + ?Sized>(
        &self,
        params: &PolicyParams,
        model: &M,
        settings: FeedbackSettings,
    ) -> TaxResult<FeedbackOutcome> {
        solve_with_debt_feedback(self.inputs_for(params), model, settings)
    }

    /// Liability under both policies and the change between them
    pub fn compare(
        &self,
        baseline: &PolicyParams,
        reform: &PolicyParams,
    ) -> TaxResult<RevenueComparison> {
        let (base_return, reform_return) =
            rayon::join(|| self.run(baseline), || self.run(reform));
        let (base_return, reform_return) = (base_return?, reform_return?);
        let comparison = build_comparison(&base_return, &reform_return)?;
        info!(
            "reform changes corporate liability by {:.3} over the window",
            comparison.total_change()
        );
        Ok(comparison)
    }
}

fn build_comparison(
    baseline: &CorpTaxReturn,
    reform: &CorpTaxReturn,
) -> TaxResult<RevenueComparison> {
    let base_tax = baseline.get_tax()?;
    let reform_tax = reform.get_tax()?;
    baseline.window().check("reform.taxrev", &reform_tax)?;

    let rows = baseline
        .window()
        .years()
        .into_iter()
        .enumerate()
        .map(|(i, year)| RevenueChangeRow {
            year,
            baseline: base_tax[i],
            reform: reform_tax[i],
            change: reform_tax[i] - base_tax[i],
        })
        .collect();

    Ok(RevenueComparison {
        rows,
        baseline: baseline.combined_return(),
        reform: reform.combined_return(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{DebtOutput, DepreciationOutput, ForeignOutput};
    use crate::inputs::{Credits, Deductions, Revenues};
    use crate::params::{AmtCalibration, CalibrationSpec, Reform};
    use crate::series::{BudgetWindow, YearSeries};
    use approx::assert_relative_eq;

    fn runner() -> (ScenarioRunner, PolicyParams) {
        let window = BudgetWindow::new(2016, 4);
        let base = PolicyParams::current_law(window).unwrap();
        let baseline = Reform::new().with(2016, "tau_amt", 0.0).apply(&base).unwrap();
        let template = ReturnInputs {
            params: baseline.clone(),
            calibration: AmtCalibration::from_spec(
                &CalibrationSpec { base_year_amt: 0.0, ..Default::default() },
                window,
            )
            .unwrap(),
            revenues: Revenues {
                receipts: YearSeries::constant(4, 2000.0),
                ..Revenues::zeros(4)
            },
            deductions: Deductions {
                cogs: YearSeries::constant(4, 1000.0),
                ..Deductions::zeros(4)
            },
            credits: Credits::zeros(4),
            depreciation: DepreciationOutput { tax_dep: YearSeries::constant(4, 200.0) },
            debt: DebtOutput::zeros(4),
            foreign: ForeignOutput::zeros(4),
        };
        (ScenarioRunner::new(template).unwrap(), baseline)
    }

    #[test]
    fn test_rate_cut_comparison() {
        let (runner, baseline) = runner();
        let reform = Reform::new().with(2018, "tau_c", 0.21).apply(&baseline).unwrap();

        let comparison = runner.compare(&baseline, &reform).unwrap();
        assert_eq!(comparison.rows.len(), 4);
        assert_eq!(comparison.rows[0].year, 2016);

        // Taxable income 800 (no production share)
        assert_relative_eq!(comparison.rows[0].change, 0.0);
        assert_relative_eq!(comparison.rows[1].change, 0.0);
        assert_relative_eq!(comparison.rows[2].change, 800.0 * (0.21 - 0.35), epsilon = 1e-9);
        assert_relative_eq!(comparison.total_change(), 2.0 * 800.0 * (0.21 - 0.35), epsilon = 1e-9);
        assert!(comparison.reform.is_complete());
    }

    #[test]
    fn test_comparison_csv() {
        let (runner, baseline) = runner();
        let comparison = runner.compare(&baseline, &baseline).unwrap();

        let mut out = Vec::new();
        comparison.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("year,baseline,reform,change\n2016,280.0,280.0,0.0"));
    }

    #[test]
    fn test_runs_do_not_leak_between_policies() {
        let (runner, baseline) = runner();
        let reform = Reform::new().with(2016, "tau_c", 0.0).apply(&baseline).unwrap();
        let zero = runner.run(&reform).unwrap();
        let again = runner.run(&baseline).unwrap();

        assert_eq!(zero.get_tax().unwrap().total(), 0.0);
        assert_relative_eq!(again.get_tax().unwrap()[0], 280.0);
    }
}
