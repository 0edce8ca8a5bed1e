//! Run the corporate return for one scenario file
//!
//! Writes the combined return as CSV and, with `--compare`, the year-by-year
//! change in liability between the scenario's policy and its reform.

use anyhow::{Context, Result};
use clap::Parser;
use corptax_engine::scenario::{FeedbackSettings, ScenarioRunner};
use corptax_engine::ScenarioConfig;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "run_return")]
#[command(about = "Compute corporate tax liability over a budget window", long_about = None)]
struct Cli {
    /// Scenario JSON file; table paths inside it are relative to this file
    #[arg(long)]
    scenario: PathBuf,

    /// Combined return CSV
    #[arg(long, default_value = "combined_return.csv")]
    output: PathBuf,

    /// Also write revenue_change.csv comparing baseline and reform
    #[arg(long)]
    compare: bool,

    /// Passes of the debt feedback loop
    #[arg(long, default_value_t = 1)]
    feedback_passes: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let config = ScenarioConfig::from_path(&cli.scenario)
        .with_context(|| format!("failed to read scenario {}", cli.scenario.display()))?;
    let base_dir = cli.scenario.parent().unwrap_or_else(|| Path::new("."));
    let scenario = config
        .load(base_dir)
        .context("failed to load scenario inputs")?;
    println!(
        "Loaded scenario for {}-{}",
        config.window.start_year,
        config.window.end_year()
    );

    let reform_params = scenario.inputs.params.clone();
    let debt = scenario.inputs.debt.clone();
    let runner = ScenarioRunner::new(scenario.inputs)?;

    let settings = FeedbackSettings {
        max_passes: cli.feedback_passes.max(1),
        ..FeedbackSettings::default()
    };
    let outcome = runner.run_with_feedback(&reform_params, &debt, settings)?;
    let combined = outcome.tax_return.combined_return();

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    combined.write_csv(file)?;
    println!("Combined return written to {}", cli.output.display());

    let taxrev = outcome.tax_return.get_tax()?;
    println!("\nCorporate liability:");
    for (year, value) in combined.years().into_iter().zip(taxrev.iter()) {
        println!("  {year}: {value:>14.3}");
    }
    println!("  Total: {:>13.3}", taxrev.total());

    if cli.compare {
        let comparison = runner.compare(&scenario.baseline, &reform_params)?;
        let path = cli.output.with_file_name("revenue_change.csv");
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        comparison.write_csv(file)?;
        println!(
            "\nReform changes liability by {:.3}; written to {}",
            comparison.total_change(),
            path.display()
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
