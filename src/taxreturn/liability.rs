//! Final liability after AMT and credits

use crate::error::TaxResult;
use crate::series::{BudgetWindow, YearSeries};

/// taxrev = max(taxbc + amt - ftc - pymtc - gbc, 0)
///
/// Credits in excess of liability are lost; nothing carries forward here.
pub fn final_liability(
    window: &BudgetWindow,
    taxbc: &YearSeries,
    amt: &YearSeries,
    ftc: &YearSeries,
    pymtc: &YearSeries,
    gbc: &YearSeries,
) -> TaxResult<YearSeries> {
    window.check("taxbc", taxbc)?;
    window.check("amt", amt)?;
    window.check("ftc", ftc)?;
    window.check("pymtc", pymtc)?;
    window.check("gbc", gbc)?;

    let liability = taxbc
        .plus(amt)
        .minus(ftc)
        .minus(pymtc)
        .minus(gbc)
        .floored(0.0);
    Ok(liability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_credits_reduce_liability_to_zero_at_most() {
        let window = BudgetWindow::new(2020, 2);
        let taxrev = final_liability(
            &window,
            &YearSeries::new(vec![100.0, 100.0]),
            &YearSeries::new(vec![10.0, 0.0]),
            &YearSeries::new(vec![20.0, 80.0]),
            &YearSeries::new(vec![5.0, 30.0]),
            &YearSeries::new(vec![15.0, 10.0]),
        )
        .unwrap();

        assert_relative_eq!(taxrev[0], 70.0);
        assert_eq!(taxrev[1], 0.0);
    }
}
