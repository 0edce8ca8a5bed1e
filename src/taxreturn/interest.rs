//! Earnings-based interest deduction limit with disallowed-interest carryforward
//!
//! Each year:
//! 1. ATI = max(EBITDA - capital gains - depreciation
//!    + addback * (depreciation + amortization + depletion), ATI_FLOOR)
//! 2. cap = ATI * limit + interest income
//! 3. eligible = interest eligible this year + disallowed carried in
//! 4. allowed = min(cap, eligible); the remainder carries forward
//!
//! Allowed interest and interest income are then haircut to give the net
//! interest deduction, and the deductible share of interest paid is returned
//! for the debt model.

use crate::error::TaxResult;
use crate::external::DebtOutput;
use crate::params::PolicyParams;
use crate::series::YearSeries;
use log::debug;

/// Floor on adjusted taxable income
pub const ATI_FLOOR: f64 = 0.0001;

/// Added to interest paid before dividing by it
pub const INT_PAID_GUARD: f64 = 0.000001;

/// Disallowed interest carried into the next year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarryforwardState {
    pub disallowed: f64,
}

/// Inputs to one year of the limitation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestYear {
    pub ebitda: f64,
    pub capgains: f64,
    pub tax_dep: f64,
    pub amortization: f64,
    pub depletion: f64,
    pub addback: f64,
    pub limit: f64,
    pub int_income: f64,
    pub int_deductible: f64,
}

/// Outcome of one year of the limitation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestYearResult {
    pub adjusted_taxinc: f64,
    pub cap: f64,
    pub eligible: f64,
    pub allowed: f64,
}

impl InterestYear {
    pub fn adjusted_taxinc(&self) -> f64 {
        let ati = self.ebitda - self.capgains - self.tax_dep
            + self.addback * (self.tax_dep + self.amortization + self.depletion);
        ati.max(ATI_FLOOR)
    }

    pub fn cap(&self) -> f64 {
        self.adjusted_taxinc() * self.limit + self.int_income
    }
}

/// Advance the carryforward by one year
pub fn step(state: CarryforwardState, year: &InterestYear) -> (CarryforwardState, InterestYearResult) {
    let adjusted_taxinc = year.adjusted_taxinc();
    let cap = year.cap();
    let eligible = year.int_deductible + state.disallowed;
    let allowed = cap.min(eligible);

    let next = CarryforwardState {
        disallowed: eligible - allowed,
    };
    let result = InterestYearResult {
        adjusted_taxinc,
        cap,
        eligible,
        allowed,
    };
    (next, result)
}

/// Full-window result of the interest limitation
#[derive(Debug, Clone, PartialEq)]
pub struct InterestDeduction {
    /// Net interest deduction (deductible interest less taxable interest income)
    pub nid: YearSeries,
    /// Deductible interest over interest paid, for the debt model's next pass
    pub frac_deductible: YearSeries,
    pub adjusted_taxinc: YearSeries,
    pub cap: YearSeries,
    pub eligible: YearSeries,
    pub allowed: YearSeries,
    /// Disallowed balance at the end of each year
    pub carryforward: YearSeries,
}

/// Run the limitation over the window in increasing year order
///
/// `capgains` must already reflect the capital gains haircut.
pub fn limit_interest(
    params: &PolicyParams,
    ebitda: &YearSeries,
    tax_dep: &YearSeries,
    capgains: &YearSeries,
    amortization: &YearSeries,
    depletion: &YearSeries,
    debt: &DebtOutput,
) -> TaxResult<InterestDeduction> {
    let window = params.window;
    window.check("ebitda", ebitda)?;
    window.check("taxDep", tax_dep)?;
    window.check("revenues.capgains", capgains)?;
    window.check("deductions.amortization", amortization)?;
    window.check("deductions.depletion", depletion)?;
    debt.check(&window)?;

    let n = window.num_years;
    let mut adjusted_taxinc = Vec::with_capacity(n);
    let mut cap = Vec::with_capacity(n);
    let mut eligible = Vec::with_capacity(n);
    let mut allowed = Vec::with_capacity(n);
    let mut carryforward = Vec::with_capacity(n);

    let mut state = CarryforwardState::default();
    for i in 0..n {
        let year = InterestYear {
            ebitda: ebitda[i],
            capgains: capgains[i],
            tax_dep: tax_dep[i],
            amortization: amortization[i],
            depletion: depletion[i],
            addback: params.adjusted_taxinc_addback[i],
            limit: params.adjusted_taxinc_limit[i],
            int_income: debt.int_income[i],
            int_deductible: debt.int_deductible[i],
        };
        let (next, result) = step(state, &year);
        debug!(
            "interest {}: eligible {:.4}, allowed {:.4}, carryforward {:.4}",
            window.start_year + i as u32,
            result.eligible,
            result.allowed,
            next.disallowed
        );

        adjusted_taxinc.push(result.adjusted_taxinc);
        cap.push(result.cap);
        eligible.push(result.eligible);
        allowed.push(result.allowed);
        carryforward.push(next.disallowed);
        state = next;
    }
    let allowed = YearSeries::new(allowed);

    let taxable_int_income = debt
        .int_income
        .after_haircut(&params.int_income_hc)
        .plus(&debt.muni_income.after_haircut(&params.muni_int_income_hc));
    let deductible_int = allowed.after_haircut(&params.int_paid_hc);

    let nid = deductible_int.minus(&taxable_int_income);
    let frac_deductible = deductible_int.zip_with(&debt.int_paid, |ded, paid| {
        ded / (paid + INT_PAID_GUARD)
    });

    Ok(InterestDeduction {
        nid,
        frac_deductible,
        adjusted_taxinc: YearSeries::new(adjusted_taxinc),
        cap: YearSeries::new(cap),
        eligible: YearSeries::new(eligible),
        allowed,
        carryforward: YearSeries::new(carryforward),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Reform, UNLIMITED_INTEREST_CAP};
    use crate::series::BudgetWindow;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    /// A year whose cap works out to exactly `cap` (ATI = cap * 10, limit 0.1)
    fn year_with_cap(cap: f64, int_deductible: f64) -> InterestYear {
        InterestYear {
            ebitda: cap * 10.0,
            capgains: 0.0,
            tax_dep: 0.0,
            amortization: 0.0,
            depletion: 0.0,
            addback: 0.0,
            limit: 0.1,
            int_income: 0.0,
            int_deductible,
        }
    }

    #[test]
    fn test_carryforward_compounds() {
        let mut state = CarryforwardState::default();
        let mut allowed = Vec::new();
        let mut eligible = Vec::new();
        let mut carry = Vec::new();

        for _ in 0..3 {
            let (next, result) = step(state, &year_with_cap(60.0, 100.0));
            assert_relative_eq!(result.cap, 60.0, epsilon = 1e-9);
            allowed.push(result.allowed);
            eligible.push(result.eligible);
            carry.push(next.disallowed);
            state = next;
        }

        for (got, want) in allowed.iter().zip([60.0, 60.0, 60.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        for (got, want) in eligible.iter().zip([100.0, 140.0, 180.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        for (got, want) in carry.iter().zip([40.0, 80.0, 120.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_carryforward_is_used_up_when_cap_loosens() {
        let (state, _) = step(CarryforwardState::default(), &year_with_cap(60.0, 100.0));
        assert_relative_eq!(state.disallowed, 40.0, epsilon = 1e-9);

        let (state, result) = step(state, &year_with_cap(500.0, 100.0));
        assert_relative_eq!(result.allowed, 140.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.disallowed, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ati_floor_and_addback() {
        let mut year = year_with_cap(0.0, 10.0);
        year.ebitda = -500.0;
        assert_eq!(year.adjusted_taxinc(), ATI_FLOOR);

        let year = InterestYear {
            ebitda: 1000.0,
            capgains: 50.0,
            tax_dep: 200.0,
            amortization: 30.0,
            depletion: 20.0,
            addback: 1.0,
            limit: 0.3,
            int_income: 10.0,
            int_deductible: 0.0,
        };
        // 1000 - 50 - 200 + (200 + 30 + 20)
        assert_relative_eq!(year.adjusted_taxinc(), 1000.0);
        assert_relative_eq!(year.cap(), 310.0);
    }

    #[test]
    fn test_unconstrained_nid_is_income_minus_paid() {
        let window = BudgetWindow::new(2020, 3);
        let base = PolicyParams::current_law(window).unwrap();
        let params = Reform::new()
            .with(2020, "muni_int_income_hc", 0.0)
            .apply(&base)
            .unwrap();
        assert_eq!(params.adjusted_taxinc_limit[0], UNLIMITED_INTEREST_CAP);

        let debt = DebtOutput {
            int_income: YearSeries::new(vec![15.0, 20.0, 25.0]),
            int_paid: YearSeries::new(vec![100.0, 120.0, 90.0]),
            int_deductible: YearSeries::new(vec![100.0, 120.0, 90.0]),
            muni_income: YearSeries::zeros(3),
        };
        let zeros = YearSeries::zeros(3);
        let result = limit_interest(
            &params,
            &YearSeries::constant(3, 1000.0),
            &YearSeries::constant(3, 100.0),
            &zeros,
            &zeros,
            &zeros,
            &debt,
        )
        .unwrap();

        for i in 0..3 {
            assert_relative_eq!(result.nid[i], debt.int_paid[i] - debt.int_income[i], epsilon = 1e-9);
            assert_relative_eq!(result.frac_deductible[i], 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(result.carryforward[i], 0.0);
        }
    }

    #[test]
    fn test_haircuts_on_both_sides() {
        let window = BudgetWindow::new(2020, 1);
        let base = PolicyParams::current_law(window).unwrap();
        let params = Reform::new()
            .with(2020, "int_paid_hc", 0.5)
            .with(2020, "int_income_hc", 0.2)
            .with(2020, "muni_int_income_hc", 0.9)
            .apply(&base)
            .unwrap();
        let debt = DebtOutput {
            int_income: YearSeries::new(vec![10.0]),
            int_paid: YearSeries::new(vec![80.0]),
            int_deductible: YearSeries::new(vec![80.0]),
            muni_income: YearSeries::new(vec![30.0]),
        };
        let zeros = YearSeries::zeros(1);
        let result = limit_interest(
            &params,
            &YearSeries::new(vec![1000.0]),
            &zeros,
            &zeros,
            &zeros,
            &zeros,
            &debt,
        )
        .unwrap();

        // 80 * 0.5 - (10 * 0.8 + 30 * 0.1)
        assert_relative_eq!(result.nid[0], 29.0, epsilon = 1e-9);
        assert_relative_eq!(result.frac_deductible[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_interest_paid_is_guarded() {
        let window = BudgetWindow::new(2020, 1);
        let params = PolicyParams::current_law(window).unwrap();
        let zeros = YearSeries::zeros(1);
        let result = limit_interest(
            &params,
            &YearSeries::new(vec![1000.0]),
            &zeros,
            &zeros,
            &zeros,
            &zeros,
            &DebtOutput::zeros(1),
        )
        .unwrap();
        assert_eq!(result.frac_deductible[0], 0.0);
        assert!(result.frac_deductible[0].is_finite());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_carryforward_never_negative(
            caps in proptest::collection::vec(0.0f64..500.0, 1..20),
            paid in proptest::collection::vec(0.0f64..500.0, 1..20),
        ) {
            let mut state = CarryforwardState::default();
            for (cap, paid) in caps.iter().zip(paid.iter()) {
                let (next, result) = step(state, &year_with_cap(*cap, *paid));
                prop_assert!(next.disallowed >= 0.0);
                prop_assert!(result.allowed <= result.eligible + 1e-9);
                state = next;
            }
        }
    }
}
