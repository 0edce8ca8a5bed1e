//! Year-indexed series and the budget window they are aligned on

use crate::error::{TaxError, TaxResult};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// First year of the default budget window
pub const DEFAULT_START_YEAR: u32 = 2014;

/// Number of years in the default budget window (2014-2027)
pub const DEFAULT_NUM_YEARS: usize = 14;

/// Contiguous range of years every series in a computation is aligned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetWindow {
    pub start_year: u32,
    pub num_years: usize,
}

impl Default for BudgetWindow {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            num_years: DEFAULT_NUM_YEARS,
        }
    }
}

impl BudgetWindow {
    pub fn new(start_year: u32, num_years: usize) -> Self {
        Self { start_year, num_years }
    }

    /// Last year in the window (inclusive)
    pub fn end_year(&self) -> u32 {
        self.start_year + self.num_years.saturating_sub(1) as u32
    }

    pub fn years(&self) -> Vec<u32> {
        (0..self.num_years).map(|i| self.start_year + i as u32).collect()
    }

    /// Index of a calendar year within the window, if it falls inside it
    pub fn index_of(&self, year: u32) -> Option<usize> {
        if year < self.start_year || year > self.end_year() {
            return None;
        }
        Some((year - self.start_year) as usize)
    }

    /// Fail with a configuration error unless `series` spans exactly this window
    pub fn check(&self, name: &str, series: &YearSeries) -> TaxResult<()> {
        if series.len() != self.num_years {
            return Err(TaxError::LengthMismatch {
                name: name.to_string(),
                expected: self.num_years,
                actual: series.len(),
            });
        }
        Ok(())
    }
}

/// One value per year of the budget window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearSeries(Vec<f64>);

impl YearSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn constant(len: usize, value: f64) -> Self {
        Self(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&v| f(v)).collect())
    }

    /// Elementwise combination; both series must already share a window
    pub fn zip_with(&self, other: &YearSeries, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.len(), other.len());
        Self(self.0.iter().zip(other.0.iter()).map(|(&a, &b)| f(a, b)).collect())
    }

    pub fn plus(&self, other: &YearSeries) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn minus(&self, other: &YearSeries) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn times(&self, other: &YearSeries) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// Scale by `(1 - haircut)` year by year
    pub fn after_haircut(&self, haircut: &YearSeries) -> Self {
        self.zip_with(haircut, |a, hc| a * (1.0 - hc))
    }

    pub fn floored(&self, floor: f64) -> Self {
        self.map(|v| v.max(floor))
    }

    /// Largest absolute elementwise difference between two series
    pub fn max_abs_diff(&self, other: &YearSeries) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Overwrite this year and every later one with `value`
    pub(crate) fn set_from(&mut self, index: usize, value: f64) {
        for v in self.0.iter_mut().skip(index) {
            *v = value;
        }
    }
}

impl Index<usize> for YearSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl From<Vec<f64>> for YearSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for YearSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let window = BudgetWindow::default();
        assert_eq!(window.end_year(), 2027);
        assert_eq!(window.years().len(), 14);
        assert_eq!(window.index_of(2018), Some(4));
        assert_eq!(window.index_of(2013), None);
        assert_eq!(window.index_of(2028), None);
    }

    #[test]
    fn test_check_rejects_wrong_length() {
        let window = BudgetWindow::new(2020, 3);
        assert!(window.check("ok", &YearSeries::zeros(3)).is_ok());

        let err = window.check("receipts", &YearSeries::zeros(2)).unwrap_err();
        match err {
            TaxError::LengthMismatch { name, expected, actual } => {
                assert_eq!(name, "receipts");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_haircut_and_set_from() {
        let base = YearSeries::new(vec![100.0, 200.0, 300.0]);
        let hc = YearSeries::new(vec![0.0, 0.5, 1.0]);
        assert_eq!(base.after_haircut(&hc).values(), &[100.0, 100.0, 0.0]);

        let mut s = YearSeries::zeros(4);
        s.set_from(2, 0.21);
        assert_eq!(s.values(), &[0.0, 0.0, 0.21, 0.21]);
    }
}
