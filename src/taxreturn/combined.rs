//! The combined return: one column per intermediate and final result

use crate::error::{TaxError, TaxResult};
use crate::series::{BudgetWindow, YearSeries};
use serde::Serialize;
use std::io::Write;

/// Columns of the combined return, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Ebitda,
    TaxDep,
    Nid,
    Sec199,
    Taxinc,
    Tau,
    Taxbc,
    Ftc,
    Amt,
    Pymtc,
    Gbc,
    Taxrev,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Ebitda,
        Column::TaxDep,
        Column::Nid,
        Column::Sec199,
        Column::Taxinc,
        Column::Tau,
        Column::Taxbc,
        Column::Ftc,
        Column::Amt,
        Column::Pymtc,
        Column::Gbc,
        Column::Taxrev,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Ebitda => "ebitda",
            Column::TaxDep => "taxDep",
            Column::Nid => "nid",
            Column::Sec199 => "sec199",
            Column::Taxinc => "taxinc",
            Column::Tau => "tau",
            Column::Taxbc => "taxbc",
            Column::Ftc => "ftc",
            Column::Amt => "amt",
            Column::Pymtc => "pymtc",
            Column::Gbc => "gbc",
            Column::Taxrev => "taxrev",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One year of the combined return, as written to CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    pub year: u32,
    pub ebitda: Option<f64>,
    #[serde(rename = "taxDep")]
    pub tax_dep: Option<f64>,
    pub nid: Option<f64>,
    pub sec199: Option<f64>,
    pub taxinc: Option<f64>,
    pub tau: Option<f64>,
    pub taxbc: Option<f64>,
    pub ftc: Option<f64>,
    pub amt: Option<f64>,
    pub pymtc: Option<f64>,
    pub gbc: Option<f64>,
    pub taxrev: Option<f64>,
}

/// Year-indexed table that each pipeline stage adds its columns to
///
/// `ebitda` and `taxDep` are present from construction; every other column
/// appears once the stage owning it has run.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedReturn {
    window: BudgetWindow,
    columns: [Option<YearSeries>; 12],
}

impl CombinedReturn {
    pub fn new(window: BudgetWindow, ebitda: YearSeries, tax_dep: YearSeries) -> TaxResult<Self> {
        window.check(Column::Ebitda.name(), &ebitda)?;
        window.check(Column::TaxDep.name(), &tax_dep)?;
        let mut columns: [Option<YearSeries>; 12] = Default::default();
        columns[Column::Ebitda.slot()] = Some(ebitda);
        columns[Column::TaxDep.slot()] = Some(tax_dep);
        Ok(Self { window, columns })
    }

    pub fn window(&self) -> BudgetWindow {
        self.window
    }

    pub fn years(&self) -> Vec<u32> {
        self.window.years()
    }

    pub fn get(&self, column: Column) -> Option<&YearSeries> {
        self.columns[column.slot()].as_ref()
    }

    /// Column a stage depends on; missing means an earlier stage has not run
    pub fn require(&self, column: Column) -> TaxResult<&YearSeries> {
        self.get(column).ok_or(TaxError::MissingColumn(column.name()))
    }

    pub fn set(&mut self, column: Column, values: YearSeries) -> TaxResult<()> {
        self.window.check(column.name(), &values)?;
        self.columns[column.slot()] = Some(values);
        Ok(())
    }

    /// Drop every column computed by the pipeline, keeping the seeded inputs
    pub fn clear_computed(&mut self) {
        for column in Column::ALL {
            if !matches!(column, Column::Ebitda | Column::TaxDep) {
                self.columns[column.slot()] = None;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.columns.iter().all(Option::is_some)
    }

    pub fn rows(&self) -> Vec<CombinedRow> {
        let at = |column: Column, i: usize| self.get(column).map(|s| s[i]);
        self.years()
            .into_iter()
            .enumerate()
            .map(|(i, year)| CombinedRow {
                year,
                ebitda: at(Column::Ebitda, i),
                tax_dep: at(Column::TaxDep, i),
                nid: at(Column::Nid, i),
                sec199: at(Column::Sec199, i),
                taxinc: at(Column::Taxinc, i),
                tau: at(Column::Tau, i),
                taxbc: at(Column::Taxbc, i),
                ftc: at(Column::Ftc, i),
                amt: at(Column::Amt, i),
                pymtc: at(Column::Pymtc, i),
                gbc: at(Column::Gbc, i),
                taxrev: at(Column::Taxrev, i),
            })
            .collect()
    }

    /// Write the table as CSV; columns not yet computed are left blank
    pub fn write_csv<W: Write>(&self, writer: W) -> TaxResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
