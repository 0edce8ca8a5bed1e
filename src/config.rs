//! Scenario files
//!
//! A scenario is a JSON document naming the budget window, the policy, an
//! optional reform, the AMT calibration and the CSV tables holding line
//! items and collaborator outputs:
//!
//! ```json
//! {
//!   "window": { "start_year": 2014, "num_years": 14 },
//!   "policy": { "tau_c": 0.35 },
//!   "reform": { "2018": { "tau_c": 0.21, "tau_amt": 0.0 } },
//!   "inputs": {
//!     "revenues": "revenues.csv",
//!     "deductions": "deductions.csv",
//!     "credits": "credits.csv",
//!     "collaborators": "collaborators.csv"
//!   }
//! }
//! ```

use crate::error::TaxResult;
use crate::inputs::{load_collaborators, load_credits, load_deductions, load_revenues};
use crate::params::{AmtCalibration, CalibrationSpec, PolicyParams, PolicySpec, Reform};
use crate::series::BudgetWindow;
use crate::taxreturn::ReturnInputs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Locations of the input tables, relative to the scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputPaths {
    pub revenues: PathBuf,
    pub deductions: PathBuf,
    pub credits: PathBuf,
    pub collaborators: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub window: BudgetWindow,
    #[serde(default)]
    pub policy: PolicySpec,
    #[serde(default)]
    pub reform: Reform,
    #[serde(default)]
    pub calibration: CalibrationSpec,
    pub inputs: InputPaths,
}

/// A scenario with every table loaded and every parameter resolved
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    /// Policy before the reform is applied
    pub baseline: PolicyParams,
    /// Return inputs with the reform applied to the policy
    pub inputs: ReturnInputs,
}

impl ScenarioConfig {
    pub fn from_json(text: &str) -> TaxResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> TaxResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Resolve parameters and load the tables, relative paths against `base_dir`
    pub fn load(&self, base_dir: &Path) -> TaxResult<LoadedScenario> {
        let window = self.window;
        let baseline = PolicyParams::from_spec(&self.policy, window)?;
        let params = self.reform.apply(&baseline)?;
        let calibration = AmtCalibration::from_spec(&self.calibration, window)?;

        let resolve = |p: &PathBuf| -> PathBuf {
            if p.is_absolute() { p.clone() } else { base_dir.join(p) }
        };
        let revenues = load_revenues(&resolve(&self.inputs.revenues), &window)?;
        let deductions = load_deductions(&resolve(&self.inputs.deductions), &window)?;
        let credits = load_credits(&resolve(&self.inputs.credits), &window)?;
        let (depreciation, debt, foreign) =
            load_collaborators(&resolve(&self.inputs.collaborators), &window)?;

        let inputs = ReturnInputs {
            params,
            calibration,
            revenues,
            deductions,
            credits,
            depreciation,
            debt,
            foreign,
        };
        inputs.check()?;
        Ok(LoadedScenario { baseline, inputs })
    }
}
