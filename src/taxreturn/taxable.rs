//! Taxable income and tax before credits

use crate::error::TaxResult;
use crate::params::PolicyParams;
use crate::series::YearSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct TaxableIncome {
    /// Domestic production activities deduction
    pub sec199: YearSeries,
    /// Taxable income, floored at zero
    pub taxinc: YearSeries,
    /// Statutory rate applied each year
    pub tau: YearSeries,
    /// Tax before credits
    pub taxbc: YearSeries,
}

/// Net depreciation, interest and the production deduction out of EBITDA
pub fn compute_taxable_income(
    params: &PolicyParams,
    ebitda: &YearSeries,
    tax_dep: &YearSeries,
    nid: &YearSeries,
    sec199share: &YearSeries,
) -> TaxResult<TaxableIncome> {
    let window = params.window;
    window.check("ebitda", ebitda)?;
    window.check("taxDep", tax_dep)?;
    window.check("nid", nid)?;
    window.check("deductions.sec199share", sec199share)?;

    let netinc1 = ebitda.minus(tax_dep).minus(nid);
    let sec199 = netinc1.times(sec199share).times(&params.sec199_rt);
    let netinc2 = netinc1.minus(&sec199);
    let taxinc = netinc2.floored(0.0);
    let tau = params.tau_c.clone();
    let taxbc = taxinc.times(&tau);

    Ok(TaxableIncome { sec199, taxinc, tau, taxbc })
}
