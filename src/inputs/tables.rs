//! Line-item tables for the corporate return

use crate::error::TaxResult;
use crate::series::{BudgetWindow, YearSeries};

/// Gross revenue components
#[derive(Debug, Clone, PartialEq)]
pub struct Revenues {
    pub receipts: YearSeries,
    pub rent: YearSeries,
    pub royalties: YearSeries,
    pub capgains: YearSeries,
    pub domestic_divs: YearSeries,
    pub other: YearSeries,
}

impl Revenues {
    pub fn zeros(len: usize) -> Self {
        Self {
            receipts: YearSeries::zeros(len),
            rent: YearSeries::zeros(len),
            royalties: YearSeries::zeros(len),
            capgains: YearSeries::zeros(len),
            domestic_divs: YearSeries::zeros(len),
            other: YearSeries::zeros(len),
        }
    }

    pub fn check(&self, window: &BudgetWindow) -> TaxResult<()> {
        window.check("revenues.receipts", &self.receipts)?;
        window.check("revenues.rent", &self.rent)?;
        window.check("revenues.royalties", &self.royalties)?;
        window.check("revenues.capgains", &self.capgains)?;
        window.check("revenues.domestic_divs", &self.domestic_divs)?;
        window.check("revenues.other", &self.other)
    }
}

/// Deduction components, plus the share of income eligible for the
/// production activities deduction
#[derive(Debug, Clone, PartialEq)]
pub struct Deductions {
    pub cogs: YearSeries,
    pub execcomp: YearSeries,
    pub wages: YearSeries,
    pub repairs: YearSeries,
    pub baddebt: YearSeries,
    pub rent: YearSeries,
    pub statelocaltax: YearSeries,
    pub charity: YearSeries,
    pub amortization: YearSeries,
    pub depletion: YearSeries,
    pub advertising: YearSeries,
    pub pensions: YearSeries,
    pub benefits: YearSeries,
    pub other: YearSeries,
    pub sec199share: YearSeries,
}

impl Deductions {
    pub fn zeros(len: usize) -> Self {
        Self {
            cogs: YearSeries::zeros(len),
            execcomp: YearSeries::zeros(len),
            wages: YearSeries::zeros(len),
            repairs: YearSeries::zeros(len),
            baddebt: YearSeries::zeros(len),
            rent: YearSeries::zeros(len),
            statelocaltax: YearSeries::zeros(len),
            charity: YearSeries::zeros(len),
            amortization: YearSeries::zeros(len),
            depletion: YearSeries::zeros(len),
            advertising: YearSeries::zeros(len),
            pensions: YearSeries::zeros(len),
            benefits: YearSeries::zeros(len),
            other: YearSeries::zeros(len),
            sec199share: YearSeries::zeros(len),
        }
    }

    pub fn check(&self, window: &BudgetWindow) -> TaxResult<()> {
        for (name, series) in [
            ("deductions.cogs", &self.cogs),
            ("deductions.execcomp", &self.execcomp),
            ("deductions.wages", &self.wages),
            ("deductions.repairs", &self.repairs),
            ("deductions.baddebt", &self.baddebt),
            ("deductions.rent", &self.rent),
            ("deductions.statelocaltax", &self.statelocaltax),
            ("deductions.charity", &self.charity),
            ("deductions.amortization", &self.amortization),
            ("deductions.depletion", &self.depletion),
            ("deductions.advertising", &self.advertising),
            ("deductions.pensions", &self.pensions),
            ("deductions.benefits", &self.benefits),
            ("deductions.other", &self.other),
            ("deductions.sec199share", &self.sec199share),
        ] {
            window.check(name, series)?;
        }
        Ok(())
    }
}

/// Credits applied after AMT and PYMTC
#[derive(Debug, Clone, PartialEq)]
pub struct Credits {
    /// General business credit
    pub gbc: YearSeries,
}

impl Credits {
    pub fn zeros(len: usize) -> Self {
        Self { gbc: YearSeries::zeros(len) }
    }

    pub fn check(&self, window: &BudgetWindow) -> TaxResult<()> {
        window.check("credits.gbc", &self.gbc)
    }
}
