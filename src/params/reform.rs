//! Year-keyed policy reforms
//!
//! A reform maps a starting year to parameter overrides, e.g.
//! `{"2018": {"tau_c": 0.21, "tau_amt": 0.0}}`. Each override holds from its
//! year through the end of the budget window.

use super::policy::PolicyParams;
use crate::error::{TaxError, TaxResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reform(BTreeMap<u32, BTreeMap<String, f64>>);

impl Reform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override starting in `year`
    pub fn with(mut self, year: u32, name: &str, value: f64) -> Self {
        self.0.entry(year).or_default().insert(name.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject unknown parameters and years outside the window
    pub fn check(&self, params: &PolicyParams) -> TaxResult<()> {
        let window = params.window;
        for (&year, changes) in &self.0 {
            if window.index_of(year).is_none() {
                return Err(TaxError::YearOutsideWindow {
                    year,
                    start: window.start_year,
                    end: window.end_year(),
                });
            }
            for name in changes.keys() {
                if params.get(name).is_none() {
                    return Err(TaxError::UnknownParameter(name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Apply to a copy of `base`; `base` is never modified
    pub fn apply(&self, base: &PolicyParams) -> TaxResult<PolicyParams> {
        self.check(base)?;

        let mut params = base.clone();
        // BTreeMap iterates years in increasing order, so later reform
        // years override earlier ones from their year onward
        for (&year, changes) in &self.0 {
            let Some(index) = params.window.index_of(year) else { continue };
            for (name, &value) in changes {
                if let Some(series) = params.get_mut(name) {
                    series.set_from(index, value);
                    debug!("reform {year}: {name} = {value}");
                }
            }
        }

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::BudgetWindow;

    fn base() -> PolicyParams {
        PolicyParams::current_law(BudgetWindow::new(2016, 5)).unwrap()
    }

    #[test]
    fn test_override_holds_through_end_of_window() {
        let reform = Reform::new().with(2018, "tau_c", 0.21);
        let params = reform.apply(&base()).unwrap();

        assert_eq!(params.tau_c.values(), &[0.35, 0.35, 0.21, 0.21, 0.21]);
    }

    #[test]
    fn test_later_year_overrides_earlier() {
        let reform = Reform::new()
            .with(2017, "tau_amt", 0.0)
            .with(2019, "tau_amt", 0.15);
        let params = reform.apply(&base()).unwrap();

        assert_eq!(params.tau_amt.values(), &[0.20, 0.0, 0.0, 0.15, 0.15]);
    }

    #[test]
    fn test_json_keys_are_years() {
        let reform: Reform =
            serde_json::from_str(r#"{"2018": {"int_paid_hc": 0.5}}"#).unwrap();
        let params = reform.apply(&base()).unwrap();
        assert_eq!(params.int_paid_hc.values(), &[0.0, 0.0, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_rejects_unknown_name_and_year() {
        let unknown = Reform::new().with(2018, "tau_nc", 0.3);
        assert!(matches!(
            unknown.apply(&base()),
            Err(TaxError::UnknownParameter(name)) if name == "tau_nc"
        ));

        let outside = Reform::new().with(2030, "tau_c", 0.3);
        assert!(matches!(
            outside.apply(&base()),
            Err(TaxError::YearOutsideWindow { year: 2030, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_value() {
        let reform = Reform::new().with(2018, "pymtc_refund", 2.0);
        assert!(matches!(reform.apply(&base()), Err(TaxError::InvalidParameter { .. })));
    }
}
