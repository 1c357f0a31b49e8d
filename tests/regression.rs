//! Common code for running regression tests over the embedded demos.
use csv::Reader;
use dcf_compare::cli::demo::handle_demo_run_command;
use dcf_compare::settings::Settings;
use float_cmp::assert_approx_eq;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Numeric tolerance when comparing output values
#[allow(dead_code)]
pub const TOLERANCE: f64 = 1e-3;

// The items below give spurious warnings about being unused because of the multiple `mod
// regression` declarations in different test files, so we suppress the warnings manually

/// A row of the annual/cumulative cash-flow output files
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct CashFlowRow {
    pub year: u32,
    pub scenario: String,
    pub cash_flow: f64,
}

/// A row of the scenario metrics output file
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct ScenarioMetricsRow {
    pub scenario: String,
    pub npv: f64,
    pub irr: Option<f64>,
    pub payback_year: Option<f64>,
}

/// The single row of the comparison output file
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct ComparisonRow {
    pub break_even_year: Option<f64>,
    pub cumulative_advantage: f64,
    pub npv_uplift: f64,
    pub npv_uplift_fraction: Option<f64>,
    pub irr_improvement: Option<f64>,
}

/// Run the named demo, returning the guard for the temporary directory and
/// the path to the output folder inside it
#[allow(dead_code)]
pub fn run_demo(name: &str) -> (TempDir, PathBuf) {
    unsafe { std::env::set_var("DCF_COMPARE_LOG_LEVEL", "off") };

    let tempdir = TempDir::new().unwrap();
    let output_dir = tempdir.path().join(name);
    handle_demo_run_command(name, Some(&output_dir), false, Some(Settings::default())).unwrap();

    (tempdir, output_dir)
}

/// Read the flows for one scenario from a cash-flow CSV file, ordered by year
#[allow(dead_code)]
pub fn read_flows(file_path: &Path, scenario: &str) -> Vec<f64> {
    let mut flows: Vec<(u32, f64)> = Reader::from_path(file_path)
        .unwrap()
        .into_deserialize::<CashFlowRow>()
        .map(Result::unwrap)
        .filter(|row| row.scenario == scenario)
        .map(|row| (row.year, row.cash_flow))
        .collect();
    flows.sort_by_key(|(year, _)| *year);

    flows.into_iter().map(|(_, flow)| flow).collect()
}

/// Read the metrics row for one scenario
#[allow(dead_code)]
pub fn read_scenario_metrics(file_path: &Path, scenario: &str) -> ScenarioMetricsRow {
    Reader::from_path(file_path)
        .unwrap()
        .into_deserialize::<ScenarioMetricsRow>()
        .map(Result::unwrap)
        .find(|row| row.scenario == scenario)
        .unwrap()
}

/// Read the single comparison row
#[allow(dead_code)]
pub fn read_comparison(file_path: &Path) -> ComparisonRow {
    Reader::from_path(file_path)
        .unwrap()
        .into_deserialize::<ComparisonRow>()
        .map(Result::unwrap)
        .next()
        .unwrap()
}

/// Assert that two flow series match within tolerance
#[allow(dead_code)]
pub fn assert_flows_eq(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (actual, expected) in actual.iter().zip(expected) {
        assert_approx_eq!(f64, *actual, *expected, epsilon = TOLERANCE);
    }
}

/// The discounted sum of a series at the given rate, counting from year 0
#[allow(dead_code)]
pub fn npv(flows: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(year, flow)| flow / (1.0 + rate).powi(year as i32))
        .sum()
}

/// The running sum of a series
#[allow(dead_code)]
pub fn cumulative(flows: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    flows
        .iter()
        .map(|flow| {
            total += flow;
            total
        })
        .collect()
}
