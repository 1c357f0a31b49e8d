//! The module responsible for writing output data to disk.
use crate::metrics::{ComparisonMetrics, ScenarioMetrics};
use crate::scenario::{CashFlowSeries, Scenario};
use crate::units::{Dimensionless, Money, Year};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which per-assumptions-file output folders will be
/// created
const OUTPUT_DIRECTORY_ROOT: &str = "dcf_compare_results";

/// The output file name for annual cash flows
const ANNUAL_CASH_FLOW_FILE_NAME: &str = "annual_cash_flow.csv";

/// The output file name for cumulative cash flows
const CUMULATIVE_CASH_FLOW_FILE_NAME: &str = "cumulative_cash_flow.csv";

/// The output file name for per-scenario summary metrics
const SCENARIO_METRICS_FILE_NAME: &str = "scenario_metrics.csv";

/// The output file name for cross-scenario comparison metrics
const COMPARISON_FILE_NAME: &str = "comparison.csv";

/// Get the default output directory for the specified assumptions file
pub fn get_output_dir(assumptions_path: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified a relative path such as "."
    let assumptions_path = assumptions_path
        .canonicalize()
        .context("Could not resolve path to assumptions file")?;

    let model_name = assumptions_path
        .file_stem()
        .context("Assumptions path has no file name")?
        .to_str()
        .context("Invalid chars in assumptions file name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create the output directory for a run.
///
/// An existing directory is only reused when `overwrite` is set, as its
/// contents will be clobbered.
///
/// # Returns
///
/// Whether an existing directory is being reused
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    if !output_dir.is_dir() {
        // Try to create the directory, with parents
        fs::create_dir_all(output_dir)?;
        return Ok(false);
    }

    ensure!(
        overwrite,
        "Output directory {} already exists (pass --overwrite to replace its contents)",
        output_dir.display()
    );

    Ok(true)
}

/// Represents a row in the annual/cumulative cash-flow CSV files
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CashFlowRow {
    year: u32,
    scenario: Scenario,
    cash_flow: Money,
}

/// Represents a row in the per-scenario metrics CSV file.
///
/// Empty fields stand for metrics that are not computable ("never" for the
/// payback year, "n/a" for the IRR).
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ScenarioMetricsRow {
    scenario: Scenario,
    npv: Money,
    irr: Option<Dimensionless>,
    payback_year: Option<Year>,
}

impl ScenarioMetricsRow {
    /// Create a new [`ScenarioMetricsRow`]
    fn new(scenario: Scenario, metrics: &ScenarioMetrics) -> Self {
        Self {
            scenario,
            npv: metrics.npv,
            irr: metrics.irr,
            payback_year: metrics.payback_year,
        }
    }
}

/// Represents the single row of the comparison CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ComparisonRow {
    break_even_year: Option<Year>,
    cumulative_advantage: Money,
    npv_uplift: Money,
    npv_uplift_fraction: Option<Dimensionless>,
    irr_improvement: Option<Dimensionless>,
}

/// An object for writing evaluation results to file
pub struct DataWriter {
    annual_flows_writer: csv::Writer<File>,
    cumulative_flows_writer: csv::Writer<File>,
    scenario_metrics_writer: csv::Writer<File>,
    comparison_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            annual_flows_writer: new_writer(ANNUAL_CASH_FLOW_FILE_NAME)?,
            cumulative_flows_writer: new_writer(CUMULATIVE_CASH_FLOW_FILE_NAME)?,
            scenario_metrics_writer: new_writer(SCENARIO_METRICS_FILE_NAME)?,
            comparison_writer: new_writer(COMPARISON_FILE_NAME)?,
        })
    }

    /// Write one scenario's annual cash flows to a CSV file
    pub fn write_annual_flows(
        &mut self,
        scenario: Scenario,
        series: &CashFlowSeries,
    ) -> Result<()> {
        for (year, flow) in series.values().iter().enumerate() {
            let row = CashFlowRow {
                year: year as u32,
                scenario,
                cash_flow: *flow,
            };
            self.annual_flows_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write one scenario's cumulative cash flows to a CSV file
    pub fn write_cumulative_flows(
        &mut self,
        scenario: Scenario,
        series: &CashFlowSeries,
    ) -> Result<()> {
        for (year, flow) in series.cumulative().into_iter().enumerate() {
            let row = CashFlowRow {
                year: year as u32,
                scenario,
                cash_flow: flow,
            };
            self.cumulative_flows_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write one scenario's summary metrics to a CSV file
    pub fn write_scenario_metrics(
        &mut self,
        scenario: Scenario,
        metrics: &ScenarioMetrics,
    ) -> Result<()> {
        let row = ScenarioMetricsRow::new(scenario, metrics);
        self.scenario_metrics_writer.serialize(row)?;

        Ok(())
    }

    /// Write the cross-scenario comparison metrics to a CSV file
    pub fn write_comparison(&mut self, comparison: &ComparisonMetrics) -> Result<()> {
        let row = ComparisonRow {
            break_even_year: comparison.break_even_year,
            cumulative_advantage: comparison.cumulative_advantage,
            npv_uplift: comparison.npv_uplift,
            npv_uplift_fraction: comparison.npv_uplift_fraction,
            irr_improvement: comparison.irr_improvement,
        };
        self.comparison_writer.serialize(row)?;

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.annual_flows_writer.flush()?;
        self.cumulative_flows_writer.flush()?;
        self.scenario_metrics_writer.flush()?;
        self.comparison_writer.flush()?;

        Ok(())
    }
}
