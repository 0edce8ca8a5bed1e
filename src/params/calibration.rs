//! AMT and minimum tax credit calibration
//!
//! These constants come from a historical calibration external to the engine.
//! They are configuration, not code: re-calibrating changes the numbers here
//! and leaves the simulation untouched.

use super::policy::ParamValue;
use crate::error::{TaxError, TaxResult};
use crate::series::{BudgetWindow, YearSeries};
use serde::{Deserialize, Serialize};

/// Calibration as written in a scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSpec {
    /// Elasticity of AMT exposure with respect to the rate gap (kappa)
    #[serde(default = "default_elasticity")]
    pub elasticity: f64,

    /// Fraction of income exposed to the AMT under the baseline rates
    #[serde(default = "default_baseline_frac")]
    pub baseline_frac: f64,

    /// Baseline probability that available credit stays available
    #[serde(default = "default_trans_amt0")]
    pub trans_amt0: f64,

    /// Baseline probability that maturing credit stays maturing
    #[serde(default = "default_trans_amt1")]
    pub trans_amt1: f64,

    /// AMT liability in the historical base year
    #[serde(default = "default_base_year_amt")]
    pub base_year_amt: f64,

    /// Share of available credit used each year when not refundable
    #[serde(default = "default_userate")]
    pub userate: f64,

    /// Cross-sector rescaling applied to AMT and PYMTC
    #[serde(default = "default_rescale")]
    pub rescale: ParamValue,
}

fn default_elasticity() -> f64 { 4.0 }
fn default_baseline_frac() -> f64 { 0.05 }
fn default_trans_amt0() -> f64 { 0.85 }
fn default_trans_amt1() -> f64 { 0.6 }
fn default_base_year_amt() -> f64 { 4.1 }
fn default_userate() -> f64 { 0.2 }
fn default_rescale() -> ParamValue { ParamValue::Scalar(1.0) }

impl Default for CalibrationSpec {
    fn default() -> Self {
        Self {
            elasticity: default_elasticity(),
            baseline_frac: default_baseline_frac(),
            trans_amt0: default_trans_amt0(),
            trans_amt1: default_trans_amt1(),
            base_year_amt: default_base_year_amt(),
            userate: default_userate(),
            rescale: default_rescale(),
        }
    }
}

/// Validated calibration with the rescale factor expanded over the window
#[derive(Debug, Clone, PartialEq)]
pub struct AmtCalibration {
    pub elasticity: f64,
    pub baseline_frac: f64,
    pub trans_amt0: f64,
    pub trans_amt1: f64,
    pub base_year_amt: f64,
    pub userate: f64,
    pub rescale: YearSeries,
}

impl AmtCalibration {
    pub fn from_spec(spec: &CalibrationSpec, window: BudgetWindow) -> TaxResult<Self> {
        let calibration = Self {
            elasticity: spec.elasticity,
            baseline_frac: spec.baseline_frac,
            trans_amt0: spec.trans_amt0,
            trans_amt1: spec.trans_amt1,
            base_year_amt: spec.base_year_amt,
            userate: spec.userate,
            rescale: spec.rescale.resolve("rescale", &window)?,
        };
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn default_for(window: BudgetWindow) -> TaxResult<Self> {
        Self::from_spec(&CalibrationSpec::default(), window)
    }

    /// Replace the cross-sector rescaling factors
    pub fn update_rescaling(&mut self, rescale: YearSeries) -> TaxResult<()> {
        if rescale.len() != self.rescale.len() {
            return Err(TaxError::LengthMismatch {
                name: "rescale".to_string(),
                expected: self.rescale.len(),
                actual: rescale.len(),
            });
        }
        self.rescale = rescale;
        self.validate()
    }

    /// The steady state divides by `userate` and `1 - trans_amt1`
    pub fn validate(&self) -> TaxResult<()> {
        if !(self.elasticity.is_finite() && self.elasticity > 0.0) {
            return Err(bad(format!("elasticity must be positive, got {}", self.elasticity)));
        }
        if !(self.baseline_frac > 0.0 && self.baseline_frac < 1.0) {
            return Err(bad(format!(
                "baseline_frac must lie in (0, 1), got {}",
                self.baseline_frac
            )));
        }
        if !(0.0..=1.0).contains(&self.trans_amt0) {
            return Err(bad(format!("trans_amt0 must lie in [0, 1], got {}", self.trans_amt0)));
        }
        if !(0.0..1.0).contains(&self.trans_amt1) {
            return Err(bad(format!("trans_amt1 must lie in [0, 1), got {}", self.trans_amt1)));
        }
        if !(self.userate > 0.0 && self.userate <= 1.0) {
            return Err(bad(format!("userate must lie in (0, 1], got {}", self.userate)));
        }
        if !(self.base_year_amt.is_finite() && self.base_year_amt >= 0.0) {
            return Err(bad(format!(
                "base_year_amt must be non-negative, got {}",
                self.base_year_amt
            )));
        }
        if self.rescale.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(bad("rescale factors must be finite and non-negative".to_string()));
        }
        Ok(())
    }
}

fn bad(reason: String) -> TaxError {
    TaxError::InvalidCalibration(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calibration_is_valid() {
        let cal = AmtCalibration::default_for(BudgetWindow::default()).unwrap();
        assert_eq!(cal.rescale.len(), 14);
        assert!(cal.rescale.iter().all(|&r| r == 1.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let spec: CalibrationSpec =
            serde_json::from_str(r#"{ "elasticity": 6.5, "rescale": [1.0, 0.9] }"#).unwrap();
        let cal = AmtCalibration::from_spec(&spec, BudgetWindow::new(2020, 2)).unwrap();
        assert_eq!(cal.elasticity, 6.5);
        assert_eq!(cal.userate, 0.2);
        assert_eq!(cal.rescale.values(), &[1.0, 0.9]);
    }

    #[test]
    fn test_degenerate_steady_state_is_rejected() {
        let window = BudgetWindow::new(2020, 2);
        let zero_use = CalibrationSpec { userate: 0.0, ..Default::default() };
        assert!(matches!(
            AmtCalibration::from_spec(&zero_use, window),
            Err(TaxError::InvalidCalibration(_))
        ));

        let absorbing = CalibrationSpec { trans_amt1: 1.0, ..Default::default() };
        assert!(AmtCalibration::from_spec(&absorbing, window).is_err());
    }

    #[test]
    fn test_update_rescaling_checks_length() {
        let mut cal = AmtCalibration::default_for(BudgetWindow::new(2020, 3)).unwrap();
        assert!(cal.update_rescaling(YearSeries::constant(2, 0.5)).is_err());
        cal.update_rescaling(YearSeries::constant(3, 0.5)).unwrap();
        assert_eq!(cal.rescale.values(), &[0.5, 0.5, 0.5]);
    }
}
