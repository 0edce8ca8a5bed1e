//! Business tax policy parameters
//!
//! Parameters arrive as a [`PolicySpec`] (JSON-friendly, each field either a
//! scalar or a per-year list) and are resolved against a [`BudgetWindow`]
//! into a [`PolicyParams`] holding one [`YearSeries`] per parameter.

use crate::error::{TaxError, TaxResult};
use crate::series::{BudgetWindow, YearSeries};
use serde::{Deserialize, Serialize};

/// Interest limit multiplier that never binds in practice
pub const UNLIMITED_INTEREST_CAP: f64 = 1e99;

/// Parameter names accepted by reforms, in declaration order
pub const PARAMETER_NAMES: [&str; 14] = [
    "tau_c",
    "tau_amt",
    "adjusted_taxinc_limit",
    "adjusted_taxinc_addback",
    "capgains_hc",
    "domestic_dividend_inclusion",
    "charity_hc",
    "statelocaltax_hc",
    "int_income_hc",
    "int_paid_hc",
    "muni_int_income_hc",
    "pymtc_hc",
    "pymtc_refund",
    "sec199_rt",
];

/// A parameter given either as one value for every year or year by year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Series(Vec<f64>),
}

impl ParamValue {
    /// Expand to a series spanning `window`
    pub fn resolve(&self, name: &str, window: &BudgetWindow) -> TaxResult<YearSeries> {
        let series = match self {
            ParamValue::Scalar(v) => YearSeries::constant(window.num_years, *v),
            ParamValue::Series(values) => YearSeries::new(values.clone()),
        };
        window.check(name, &series)?;
        Ok(series)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(values: Vec<f64>) -> Self {
        ParamValue::Series(values)
    }
}

/// Policy parameters as written in a scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySpec {
    /// Statutory corporate income tax rate
    #[serde(default = "default_tau_c")]
    pub tau_c: ParamValue,

    /// Corporate AMT rate (0 repeals the AMT)
    #[serde(default = "default_tau_amt")]
    pub tau_amt: ParamValue,

    /// Share of adjusted taxable income deductible as net interest
    #[serde(default = "default_unlimited")]
    pub adjusted_taxinc_limit: ParamValue,

    /// Share of depreciation, amortization and depletion added back into
    /// adjusted taxable income (1.0 = EBITDA basis, 0.0 = EBIT basis)
    #[serde(default = "default_one")]
    pub adjusted_taxinc_addback: ParamValue,

    #[serde(default = "default_zero")]
    pub capgains_hc: ParamValue,

    /// Fraction of domestic dividends included in income
    #[serde(default = "default_dividend_inclusion")]
    pub domestic_dividend_inclusion: ParamValue,

    #[serde(default = "default_zero")]
    pub charity_hc: ParamValue,

    #[serde(default = "default_zero")]
    pub statelocaltax_hc: ParamValue,

    #[serde(default = "default_zero")]
    pub int_income_hc: ParamValue,

    #[serde(default = "default_zero")]
    pub int_paid_hc: ParamValue,

    /// Municipal bond interest is excluded from income under current law
    #[serde(default = "default_one")]
    pub muni_int_income_hc: ParamValue,

    #[serde(default = "default_zero")]
    pub pymtc_hc: ParamValue,

    /// Share of the available minimum tax credit that is refundable
    #[serde(default = "default_zero")]
    pub pymtc_refund: ParamValue,

    /// Domestic production activities deduction rate
    #[serde(default = "default_sec199_rt")]
    pub sec199_rt: ParamValue,
}

fn default_tau_c() -> ParamValue { ParamValue::Scalar(0.35) }
fn default_tau_amt() -> ParamValue { ParamValue::Scalar(0.20) }
fn default_unlimited() -> ParamValue { ParamValue::Scalar(UNLIMITED_INTEREST_CAP) }
fn default_one() -> ParamValue { ParamValue::Scalar(1.0) }
fn default_zero() -> ParamValue { ParamValue::Scalar(0.0) }
fn default_dividend_inclusion() -> ParamValue { ParamValue::Scalar(0.3) }
fn default_sec199_rt() -> ParamValue { ParamValue::Scalar(0.09) }

impl Default for PolicySpec {
    fn default() -> Self {
        Self {
            tau_c: default_tau_c(),
            tau_amt: default_tau_amt(),
            adjusted_taxinc_limit: default_unlimited(),
            adjusted_taxinc_addback: default_one(),
            capgains_hc: default_zero(),
            domestic_dividend_inclusion: default_dividend_inclusion(),
            charity_hc: default_zero(),
            statelocaltax_hc: default_zero(),
            int_income_hc: default_zero(),
            int_paid_hc: default_zero(),
            muni_int_income_hc: default_one(),
            pymtc_hc: default_zero(),
            pymtc_refund: default_zero(),
            sec199_rt: default_sec199_rt(),
        }
    }
}

/// Resolved policy parameters, one series per parameter
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyParams {
    pub window: BudgetWindow,
    pub tau_c: YearSeries,
    pub tau_amt: YearSeries,
    pub adjusted_taxinc_limit: YearSeries,
    pub adjusted_taxinc_addback: YearSeries,
    pub capgains_hc: YearSeries,
    pub domestic_dividend_inclusion: YearSeries,
    pub charity_hc: YearSeries,
    pub statelocaltax_hc: YearSeries,
    pub int_income_hc: YearSeries,
    pub int_paid_hc: YearSeries,
    pub muni_int_income_hc: YearSeries,
    pub pymtc_hc: YearSeries,
    pub pymtc_refund: YearSeries,
    pub sec199_rt: YearSeries,
}

impl PolicyParams {
    /// Resolve configured values against the window and validate every value
    pub fn from_spec(spec: &PolicySpec, window: BudgetWindow) -> TaxResult<Self> {
        let params = Self {
            window,
            tau_c: spec.tau_c.resolve("tau_c", &window)?,
            tau_amt: spec.tau_amt.resolve("tau_amt", &window)?,
            adjusted_taxinc_limit: spec
                .adjusted_taxinc_limit
                .resolve("adjusted_taxinc_limit", &window)?,
            adjusted_taxinc_addback: spec
                .adjusted_taxinc_addback
                .resolve("adjusted_taxinc_addback", &window)?,
            capgains_hc: spec.capgains_hc.resolve("capgains_hc", &window)?,
            domestic_dividend_inclusion: spec
                .domestic_dividend_inclusion
                .resolve("domestic_dividend_inclusion", &window)?,
            charity_hc: spec.charity_hc.resolve("charity_hc", &window)?,
            statelocaltax_hc: spec.statelocaltax_hc.resolve("statelocaltax_hc", &window)?,
            int_income_hc: spec.int_income_hc.resolve("int_income_hc", &window)?,
            int_paid_hc: spec.int_paid_hc.resolve("int_paid_hc", &window)?,
            muni_int_income_hc: spec
                .muni_int_income_hc
                .resolve("muni_int_income_hc", &window)?,
            pymtc_hc: spec.pymtc_hc.resolve("pymtc_hc", &window)?,
            pymtc_refund: spec.pymtc_refund.resolve("pymtc_refund", &window)?,
            sec199_rt: spec.sec199_rt.resolve("sec199_rt", &window)?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Current-law defaults over the given window
    pub fn current_law(window: BudgetWindow) -> TaxResult<Self> {
        Self::from_spec(&PolicySpec::default(), window)
    }

    pub fn get(&self, name: &str) -> Option<&YearSeries> {
        let series = match name {
            "tau_c" => &self.tau_c,
            "tau_amt" => &self.tau_amt,
            "adjusted_taxinc_limit" => &self.adjusted_taxinc_limit,
            "adjusted_taxinc_addback" => &self.adjusted_taxinc_addback,
            "capgains_hc" => &self.capgains_hc,
            "domestic_dividend_inclusion" => &self.domestic_dividend_inclusion,
            "charity_hc" => &self.charity_hc,
            "statelocaltax_hc" => &self.statelocaltax_hc,
            "int_income_hc" => &self.int_income_hc,
            "int_paid_hc" => &self.int_paid_hc,
            "muni_int_income_hc" => &self.muni_int_income_hc,
            "pymtc_hc" => &self.pymtc_hc,
            "pymtc_refund" => &self.pymtc_refund,
            "sec199_rt" => &self.sec199_rt,
            _ => return None,
        };
        Some(series)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut YearSeries> {
        let series = match name {
            "tau_c" => &mut self.tau_c,
            "tau_amt" => &mut self.tau_amt,
            "adjusted_taxinc_limit" => &mut self.adjusted_taxinc_limit,
            "adjusted_taxinc_addback" => &mut self.adjusted_taxinc_addback,
            "capgains_hc" => &mut self.capgains_hc,
            "domestic_dividend_inclusion" => &mut self.domestic_dividend_inclusion,
            "charity_hc" => &mut self.charity_hc,
            "statelocaltax_hc" => &mut self.statelocaltax_hc,
            "int_income_hc" => &mut self.int_income_hc,
            "int_paid_hc" => &mut self.int_paid_hc,
            "muni_int_income_hc" => &mut self.muni_int_income_hc,
            "pymtc_hc" => &mut self.pymtc_hc,
            "pymtc_refund" => &mut self.pymtc_refund,
            "sec199_rt" => &mut self.sec199_rt,
            _ => return None,
        };
        Some(series)
    }

    /// Check ranges: rates non-negative, fractions within [0, 1]
    pub fn validate(&self) -> TaxResult<()> {
        let non_negative = [
            "tau_c",
            "tau_amt",
            "adjusted_taxinc_limit",
            "adjusted_taxinc_addback",
            "sec199_rt",
        ];
        let fractions = [
            "capgains_hc",
            "domestic_dividend_inclusion",
            "charity_hc",
            "statelocaltax_hc",
            "int_income_hc",
            "int_paid_hc",
            "muni_int_income_hc",
            "pymtc_hc",
            "pymtc_refund",
        ];

        for name in PARAMETER_NAMES {
            let Some(series) = self.get(name) else { continue };
            self.window.check(name, series)?;
            for (i, &v) in series.iter().enumerate() {
                let year = self.window.start_year + i as u32;
                if !v.is_finite() {
                    return Err(invalid(name, format!("non-finite value in {year}")));
                }
                if non_negative.contains(&name) && v < 0.0 {
                    return Err(invalid(name, format!("negative value {v} in {year}")));
                }
                if fractions.contains(&name) && !(0.0..=1.0).contains(&v) {
                    return Err(invalid(name, format!("{v} in {year} is outside [0, 1]")));
                }
            }
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: String) -> TaxError {
    TaxError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}
