//! Alternative minimum tax and minimum tax credit simulation
//!
//! Credit generated by AMT liability sits in one of two stocks:
//! - **available**: credit that can be claimed against regular tax (PYMTC)
//! - **maturing**: credit tied to firms still paying AMT, not yet usable
//!
//! Each year a share of each stock moves to the other according to transition
//! probabilities `pi0` (available stays available) and `pi1` (maturing stays
//! maturing). Those probabilities, and the AMT liability itself, depend on
//! how the AMT rate compares with the regular rate (see [`AmtRegime`]).
//!
//! The stocks are seeded with the steady state implied by the calibration:
//! the base-year AMT level recurring forever under the baseline
//! probabilities.

use crate::error::TaxResult;
use crate::params::{AmtCalibration, PolicyParams};
use crate::series::YearSeries;
use log::debug;

/// Exposure used when the AMT rate is at or above the regular rate
pub const DOMINANT_EXPOSURE: f64 = 0.999;

/// How the AMT interacts with regular tax in a given year
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmtRegime {
    /// AMT rate is zero: no liability, all credit becomes available
    NoAmt,
    /// AMT rate at or above the regular rate: nearly all income exposed,
    /// all credit moves to the maturing stock
    DominantAmt,
    /// AMT rate below the regular rate; `exposure` is the fraction of
    /// income subject to the AMT
    TransitionalAmt { exposure: f64 },
}

/// Year-over-year transition probabilities between the two credit stocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub pi0: f64,
    pub pi1: f64,
}

impl AmtRegime {
    pub fn classify(amt_rate: f64, corp_rate: f64, elasticity: f64) -> Self {
        if amt_rate == 0.0 {
            AmtRegime::NoAmt
        } else if corp_rate <= amt_rate {
            AmtRegime::DominantAmt
        } else {
            let exposure = (-elasticity * (corp_rate / amt_rate - 1.0)).exp();
            AmtRegime::TransitionalAmt { exposure }
        }
    }

    /// Fraction of income subject to the AMT
    pub fn exposure(&self) -> f64 {
        match *self {
            AmtRegime::NoAmt => 0.0,
            AmtRegime::DominantAmt => DOMINANT_EXPOSURE,
            AmtRegime::TransitionalAmt { exposure } => exposure,
        }
    }

    /// AMT liability on `taxinc` before cross-sector rescaling
    pub fn liability(&self, amt_rate: f64, corp_rate: f64, elasticity: f64, taxinc: f64) -> f64 {
        match *self {
            AmtRegime::NoAmt => 0.0,
            AmtRegime::DominantAmt => {
                (amt_rate - corp_rate + amt_rate / elasticity) * taxinc
            }
            AmtRegime::TransitionalAmt { exposure } => {
                amt_rate / elasticity * exposure * taxinc
            }
        }
    }

    /// Transition probabilities, recalibrated from the baseline in the
    /// transitional regime
    pub fn transition(&self, calibration: &AmtCalibration) -> Transition {
        match *self {
            AmtRegime::NoAmt => Transition { pi0: 1.0, pi1: 0.0 },
            AmtRegime::DominantAmt => Transition { pi0: 0.0, pi1: 1.0 },
            AmtRegime::TransitionalAmt { exposure } => {
                let pi1 = (calibration.trans_amt1
                    * (exposure / calibration.baseline_frac).sqrt())
                .clamp(0.0, 1.0);
                let pi0 = (1.0 - exposure * (1.0 - pi1) / (1.0 - exposure)).clamp(0.0, 1.0);
                Transition { pi0, pi1 }
            }
        }
    }
}

/// Minimum tax credit balances at the start of a year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmtStocks {
    pub available: f64,
    pub maturing: f64,
}

impl AmtStocks {
    /// Long-run balances with the base-year AMT level recurring every year
    pub fn steady_state(calibration: &AmtCalibration) -> Self {
        let amt = calibration.base_year_amt;
        let u = calibration.userate;
        let t0 = calibration.trans_amt0;
        let t1 = calibration.trans_amt1;

        let available = amt / u;
        let maturing = amt * (t1 / (1.0 - t1) + (1.0 - u) / u * (1.0 - t0) / (1.0 - t1));
        Self { available, maturing }
    }
}

/// Inputs to one year of the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmtYear {
    pub taxinc: f64,
    pub amt_rate: f64,
    pub corp_rate: f64,
    pub pymtc_refund: f64,
    pub pymtc_hc: f64,
}

/// Outcome of one year, before cross-sector rescaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmtYearResult {
    pub regime: AmtRegime,
    pub transition: Transition,
    pub amt: f64,
    pub pymtc: f64,
}

/// Credit claimed this year out of the available stock
pub fn pymtc_claimed(stocks: &AmtStocks, year: &AmtYear, userate: f64) -> f64 {
    let s0 = stocks.available;
    (year.pymtc_refund * s0 + (1.0 - year.pymtc_refund) * s0 * userate) * (1.0 - year.pymtc_hc)
}

/// Advance the credit stocks by one year
pub fn step(
    stocks: AmtStocks,
    year: &AmtYear,
    calibration: &AmtCalibration,
) -> (AmtStocks, AmtYearResult) {
    let regime = AmtRegime::classify(year.amt_rate, year.corp_rate, calibration.elasticity);
    let amt = regime.liability(year.amt_rate, year.corp_rate, calibration.elasticity, year.taxinc);
    let transition = regime.transition(calibration);
    let pymtc = pymtc_claimed(&stocks, year, calibration.userate);

    let generated = stocks.maturing + amt;
    let remaining = stocks.available - pymtc;
    let next = AmtStocks {
        available: generated * (1.0 - transition.pi1) + remaining * transition.pi0,
        maturing: generated * transition.pi1 + remaining * (1.0 - transition.pi0),
    };

    let result = AmtYearResult {
        regime,
        transition,
        amt,
        pymtc,
    };
    (next, result)
}

/// Full-window AMT simulation
#[derive(Debug, Clone, PartialEq)]
pub struct AmtOutcome {
    /// AMT liability after rescaling
    pub amt: YearSeries,
    /// Minimum tax credit claimed, after rescaling
    pub pymtc: YearSeries,
    /// Per-year detail before rescaling
    pub years: Vec<AmtYearResult>,
    /// Stocks at the start of each year, plus the closing balance
    pub stocks: Vec<AmtStocks>,
}

/// Simulate AMT and PYMTC over the window in increasing year order
pub fn simulate_amt(
    params: &PolicyParams,
    calibration: &AmtCalibration,
    taxinc: &YearSeries,
) -> TaxResult<AmtOutcome> {
    let window = params.window;
    window.check("taxinc", taxinc)?;
    window.check("rescale", &calibration.rescale)?;
    calibration.validate()?;

    let n = window.num_years;
    let mut stocks = Vec::with_capacity(n + 1);
    let mut years = Vec::with_capacity(n);

    let mut current = AmtStocks::steady_state(calibration);
    stocks.push(current);
    for i in 0..n {
        let year = AmtYear {
            taxinc: taxinc[i],
            amt_rate: params.tau_amt[i],
            corp_rate: params.tau_c[i],
            pymtc_refund: params.pymtc_refund[i],
            pymtc_hc: params.pymtc_hc[i],
        };
        let (next, result) = step(current, &year, calibration);
        debug!(
            "amt {}: {:?}, amt {:.4}, pymtc {:.4}, stocks {:.4}/{:.4}",
            window.start_year + i as u32,
            result.regime,
            result.amt,
            result.pymtc,
            next.available,
            next.maturing
        );
        years.push(result);
        stocks.push(next);
        current = next;
    }

    let amt: YearSeries = years.iter().map(|y| y.amt).collect();
    let pymtc: YearSeries = years.iter().map(|y| y.pymtc).collect();

    Ok(AmtOutcome {
        amt: amt.times(&calibration.rescale),
        pymtc: pymtc.times(&calibration.rescale),
        years,
        stocks,
    })
}
