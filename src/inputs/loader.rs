//! CSV loaders for line-item tables and collaborator outputs
//!
//! Every table has a `year` column plus one column per line item. Rows must
//! cover the budget window exactly, in increasing year order.

use super::tables::{Credits, Deductions, Revenues};
use crate::error::{TaxError, TaxResult};
use crate::external::{DebtOutput, DepreciationOutput, ForeignOutput};
use crate::series::{BudgetWindow, YearSeries};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

trait YearRow {
    fn year(&self) -> u32;
}

#[derive(Debug, Deserialize)]
struct RevenueRow {
    year: u32,
    receipts: f64,
    rent: f64,
    royalties: f64,
    capgains: f64,
    domestic_divs: f64,
    other: f64,
}

#[derive(Debug, Deserialize)]
struct DeductionRow {
    year: u32,
    cogs: f64,
    execcomp: f64,
    wages: f64,
    repairs: f64,
    baddebt: f64,
    rent: f64,
    statelocaltax: f64,
    charity: f64,
    amortization: f64,
    depletion: f64,
    advertising: f64,
    pensions: f64,
    benefits: f64,
    other: f64,
    #[serde(default)]
    sec199share: f64,
}

#[derive(Debug, Deserialize)]
struct CreditRow {
    year: u32,
    gbc: f64,
}

#[derive(Debug, Deserialize)]
struct CollaboratorRow {
    year: u32,
    tax_dep: f64,
    int_income: f64,
    int_paid: f64,
    int_deductible: f64,
    #[serde(default)]
    muni_income: f64,
    #[serde(default)]
    foreign_taxinc: f64,
    #[serde(default)]
    ftc: f64,
}

impl YearRow for RevenueRow {
    fn year(&self) -> u32 { self.year }
}

impl YearRow for DeductionRow {
    fn year(&self) -> u32 { self.year }
}

impl YearRow for CreditRow {
    fn year(&self) -> u32 { self.year }
}

impl YearRow for CollaboratorRow {
    fn year(&self) -> u32 { self.year }
}

/// Deserialize all rows and check they line up with the window
fn read_rows<T, R>(reader: R, name: &str, window: &BudgetWindow) -> TaxResult<Vec<T>>
where
    T: DeserializeOwned + YearRow,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::with_capacity(window.num_years);
    for result in csv_reader.deserialize() {
        let row: T = result?;
        rows.push(row);
    }

    if rows.len() != window.num_years {
        return Err(TaxError::LengthMismatch {
            name: name.to_string(),
            expected: window.num_years,
            actual: rows.len(),
        });
    }
    for (row, expected) in rows.iter().zip(window.years()) {
        if row.year() != expected {
            return Err(TaxError::YearMismatch {
                name: name.to_string(),
                expected,
                found: row.year(),
            });
        }
    }

    Ok(rows)
}

fn column<T>(rows: &[T], f: impl Fn(&T) -> f64) -> YearSeries {
    rows.iter().map(f).collect()
}

pub fn revenues_from_reader<R: Read>(reader: R, window: &BudgetWindow) -> TaxResult<Revenues> {
    let rows: Vec<RevenueRow> = read_rows(reader, "revenues", window)?;
    Ok(Revenues {
        receipts: column(&rows, |r| r.receipts),
        rent: column(&rows, |r| r.rent),
        royalties: column(&rows, |r| r.royalties),
        capgains: column(&rows, |r| r.capgains),
        domestic_divs: column(&rows, |r| r.domestic_divs),
        other: column(&rows, |r| r.other),
    })
}

pub fn deductions_from_reader<R: Read>(reader: R, window: &BudgetWindow) -> TaxResult<Deductions> {
    let rows: Vec<DeductionRow> = read_rows(reader, "deductions", window)?;
    Ok(Deductions {
        cogs: column(&rows, |r| r.cogs),
        execcomp: column(&rows, |r| r.execcomp),
        wages: column(&rows, |r| r.wages),
        repairs: column(&rows, |r| r.repairs),
        baddebt: column(&rows, |r| r.baddebt),
        rent: column(&rows, |r| r.rent),
        statelocaltax: column(&rows, |r| r.statelocaltax),
        charity: column(&rows, |r| r.charity),
        amortization: column(&rows, |r| r.amortization),
        depletion: column(&rows, |r| r.depletion),
        advertising: column(&rows, |r| r.advertising),
        pensions: column(&rows, |r| r.pensions),
        benefits: column(&rows, |r| r.benefits),
        other: column(&rows, |r| r.other),
        sec199share: column(&rows, |r| r.sec199share),
    })
}

pub fn credits_from_reader<R: Read>(reader: R, window: &BudgetWindow) -> TaxResult<Credits> {
    let rows: Vec<CreditRow> = read_rows(reader, "credits", window)?;
    Ok(Credits { gbc: column(&rows, |r| r.gbc) })
}

/// Depreciation, debt and foreign outputs exported from one table
pub fn collaborators_from_reader<R: Read>(
    reader: R,
    window: &BudgetWindow,
) -> TaxResult<(DepreciationOutput, DebtOutput, ForeignOutput)> {
    let rows: Vec<CollaboratorRow> = read_rows(reader, "collaborators", window)?;
    let depreciation = DepreciationOutput {
        tax_dep: column(&rows, |r| r.tax_dep),
    };
    let debt = DebtOutput {
        int_income: column(&rows, |r| r.int_income),
        int_paid: column(&rows, |r| r.int_paid),
        int_deductible: column(&rows, |r| r.int_deductible),
        muni_income: column(&rows, |r| r.muni_income),
    };
    let foreign = ForeignOutput {
        foreign_taxinc: column(&rows, |r| r.foreign_taxinc),
        ftc: column(&rows, |r| r.ftc),
    };
    Ok((depreciation, debt, foreign))
}

pub fn load_revenues(path: &Path, window: &BudgetWindow) -> TaxResult<Revenues> {
    revenues_from_reader(File::open(path)?, window)
}

pub fn load_deductions(path: &Path, window: &BudgetWindow) -> TaxResult<Deductions> {
    deductions_from_reader(File::open(path)?, window)
}

pub fn load_credits(path: &Path, window: &BudgetWindow) -> TaxResult<Credits> {
    credits_from_reader(File::open(path)?, window)
}

pub fn load_collaborators(
    path: &Path,
    window: &BudgetWindow,
) -> TaxResult<(DepreciationOutput, DebtOutput, ForeignOutput)> {
    collaborators_from_reader(File::open(path)?, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDITS: &str = "year,gbc\n2020,5.0\n2021,6.0\n2022,7.5\n";

    #[test]
    fn test_credits_from_reader() {
        let window = BudgetWindow::new(2020, 3);
        let credits = credits_from_reader(CREDITS.as_bytes(), &window).unwrap();
        assert_eq!(credits.gbc.values(), &[5.0, 6.0, 7.5]);
    }

    #[test]
    fn test_row_count_must_match_window() {
        let window = BudgetWindow::new(2020, 4);
        let err = credits_from_reader(CREDITS.as_bytes(), &window).unwrap_err();
        assert!(matches!(err, TaxError::LengthMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_years_must_line_up() {
        let window = BudgetWindow::new(2019, 3);
        let err = credits_from_reader(CREDITS.as_bytes(), &window).unwrap_err();
        assert!(matches!(err, TaxError::YearMismatch { expected: 2019, found: 2020, .. }));
    }

    #[test]
    fn test_collaborator_optional_columns_default_to_zero() {
        let data = "year, tax_dep, int_income, int_paid, int_deductible\n\
                    2020, 100, 5, 40, 40\n\
                    2021, 110, 5, 45, 45\n";
        let window = BudgetWindow::new(2020, 2);
        let (dep, debt, foreign) = collaborators_from_reader(data.as_bytes(), &window).unwrap();

        assert_eq!(dep.tax_dep.values(), &[100.0, 110.0]);
        assert_eq!(debt.int_paid.values(), &[40.0, 45.0]);
        assert_eq!(debt.muni_income.values(), &[0.0, 0.0]);
        assert_eq!(foreign.ftc.values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let data = "year,receipts\n2020,1000\n";
        let window = BudgetWindow::new(2020, 1);
        assert!(matches!(
            revenues_from_reader(data.as_bytes(), &window),
            Err(TaxError::Csv(_))
        ));
    }
}
