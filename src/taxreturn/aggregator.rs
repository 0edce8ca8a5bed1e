//! Revenue and deduction aggregation into EBITDA

use crate::error::TaxResult;
use crate::inputs::{Deductions, Revenues};
use crate::params::PolicyParams;
use crate::series::YearSeries;

/// Line items after haircuts, with their totals
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItems {
    pub revenues: Revenues,
    pub deductions: Deductions,
    pub total_revenue: YearSeries,
    pub total_deduction: YearSeries,
    pub ebitda: YearSeries,
}

/// Apply haircuts and inclusion rates, then total revenues and deductions
///
/// Foreign taxable income from the multinational model is counted as
/// revenue, so it is already part of the returned EBITDA.
pub fn aggregate(
    params: &PolicyParams,
    revenues: &Revenues,
    deductions: &Deductions,
    foreign_taxinc: &YearSeries,
) -> TaxResult<AggregatedItems> {
    let window = params.window;
    revenues.check(&window)?;
    deductions.check(&window)?;
    window.check("foreign.foreign_taxinc", foreign_taxinc)?;

    let mut revenues = revenues.clone();
    revenues.capgains = revenues.capgains.after_haircut(&params.capgains_hc);
    revenues.domestic_divs = revenues.domestic_divs.times(&params.domestic_dividend_inclusion);

    let mut deductions = deductions.clone();
    deductions.charity = deductions.charity.after_haircut(&params.charity_hc);
    deductions.statelocaltax = deductions.statelocaltax.after_haircut(&params.statelocaltax_hc);

    let total_revenue = revenues
        .receipts
        .plus(&revenues.rent)
        .plus(&revenues.royalties)
        .plus(&revenues.capgains)
        .plus(&revenues.domestic_divs)
        .plus(&revenues.other)
        .plus(foreign_taxinc);

    let total_deduction = deductions
        .cogs
        .plus(&deductions.execcomp)
        .plus(&deductions.wages)
        .plus(&deductions.repairs)
        .plus(&deductions.baddebt)
        .plus(&deductions.rent)
        .plus(&deductions.statelocaltax)
        .plus(&deductions.charity)
        .plus(&deductions.amortization)
        .plus(&deductions.depletion)
        .plus(&deductions.advertising)
        .plus(&deductions.pensions)
        .plus(&deductions.benefits)
        .plus(&deductions.other);

    let ebitda = total_revenue.minus(&total_deduction);

    Ok(AggregatedItems {
        revenues,
        deductions,
        total_revenue,
        total_deduction,
        ebitda,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaxError;
    use crate::params::Reform;
    use crate::series::BudgetWindow;
    use approx::assert_relative_eq;

    fn window() -> BudgetWindow {
        BudgetWindow::new(2020, 2)
    }

    #[test]
    fn test_haircuts_and_inclusion() {
        let base = PolicyParams::current_law(window()).unwrap();
        let params = Reform::new()
            .with(2020, "capgains_hc", 0.5)
            .with(2020, "domestic_dividend_inclusion", 0.3)
            .with(2020, "charity_hc", 1.0)
            .with(2021, "statelocaltax_hc", 0.25)
            .apply(&base)
            .unwrap();

        let revenues = Revenues {
            receipts: YearSeries::constant(2, 1000.0),
            capgains: YearSeries::constant(2, 200.0),
            domestic_divs: YearSeries::constant(2, 100.0),
            ..Revenues::zeros(2)
        };
        let deductions = Deductions {
            wages: YearSeries::constant(2, 300.0),
            charity: YearSeries::constant(2, 40.0),
            statelocaltax: YearSeries::constant(2, 80.0),
            ..Deductions::zeros(2)
        };
        let foreign = YearSeries::new(vec![10.0, 20.0]);

        let items = aggregate(&params, &revenues, &deductions, &foreign).unwrap();

        // 1000 + 200 * 0.5 + 100 * 0.3 + foreign
        assert_relative_eq!(items.total_revenue[0], 1140.0);
        assert_relative_eq!(items.total_revenue[1], 1150.0);
        // Charity fully disallowed; SALT haircut only from 2021
        assert_relative_eq!(items.total_deduction[0], 380.0);
        assert_relative_eq!(items.total_deduction[1], 360.0);
        assert_relative_eq!(items.ebitda[0], 760.0);
        assert_relative_eq!(items.ebitda[1], 790.0);
        assert_relative_eq!(items.revenues.capgains[0], 100.0);
    }

    #[test]
    fn test_every_deduction_counts() {
        let params = PolicyParams::current_law(window()).unwrap();
        let one = YearSeries::constant(2, 1.0);
        let deductions = Deductions {
            cogs: one.clone(),
            execcomp: one.clone(),
            wages: one.clone(),
            repairs: one.clone(),
            baddebt: one.clone(),
            rent: one.clone(),
            statelocaltax: one.clone(),
            charity: one.clone(),
            amortization: one.clone(),
            depletion: one.clone(),
            advertising: one.clone(),
            pensions: one.clone(),
            benefits: one.clone(),
            other: one.clone(),
            // Not a deduction: the production deduction share
            sec199share: one,
        };
        let items =
            aggregate(&params, &Revenues::zeros(2), &deductions, &YearSeries::zeros(2)).unwrap();
        assert_relative_eq!(items.total_deduction[0], 14.0);
    }

    #[test]
    fn test_wrong_length_is_configuration_error() {
        let params = PolicyParams::current_law(window()).unwrap();
        let revenues = Revenues {
            rent: YearSeries::zeros(3),
            ..Revenues::zeros(2)
        };
        let err = aggregate(&params, &revenues, &Deductions::zeros(2), &YearSeries::zeros(2))
            .unwrap_err();
        assert!(matches!(err, TaxError::LengthMismatch { ref name, .. } if name == "revenues.rent"));
    }
}
