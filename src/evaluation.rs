//! Functionality for evaluating a scenario comparison.
use crate::assumptions::Assumptions;
use crate::metrics::{ComparisonMetrics, ScenarioMetrics};
use crate::output::DataWriter;
use crate::scenario::{CashFlowSeries, Scenario, baseline_series, investment_series};
use crate::units::{Dimensionless, Money, Year};
use anyhow::Result;
use log::info;
use std::path::Path;

/// The complete result of evaluating one set of assumptions.
pub struct Evaluation {
    /// Annual cash flows for the no-investment baseline
    pub baseline: CashFlowSeries,
    /// Annual cash flows for the staged-investment scenario
    pub investment: CashFlowSeries,
    /// Summary metrics for the baseline series
    pub baseline_metrics: ScenarioMetrics,
    /// Summary metrics for the investment series
    pub investment_metrics: ScenarioMetrics,
    /// Metrics comparing the two scenarios
    pub comparison: ComparisonMetrics,
}

/// Evaluate both scenarios for the given assumptions.
///
/// This is a pure function: every result is recomputed from scratch and
/// nothing is cached between calls.
pub fn evaluate(assumptions: &Assumptions) -> Evaluation {
    let baseline = baseline_series(assumptions);
    let investment = investment_series(assumptions);
    let baseline_metrics = ScenarioMetrics::from_series(&baseline, assumptions.discount_rate);
    let investment_metrics = ScenarioMetrics::from_series(&investment, assumptions.discount_rate);
    let comparison = ComparisonMetrics::new(
        &baseline,
        &investment,
        &baseline_metrics,
        &investment_metrics,
    );

    Evaluation {
        baseline,
        investment,
        baseline_metrics,
        investment_metrics,
        comparison,
    }
}

/// Run an evaluation and write the results to the output folder.
///
/// # Arguments:
///
/// * `assumptions` - The assumptions to evaluate
/// * `output_path` - The folder where output files will be saved
pub fn run(assumptions: &Assumptions, output_path: &Path) -> Result<()> {
    let evaluation = evaluate(assumptions);

    let mut writer = DataWriter::create(output_path)?;
    writer.write_annual_flows(Scenario::Baseline, &evaluation.baseline)?;
    writer.write_annual_flows(Scenario::Investment, &evaluation.investment)?;
    writer.write_cumulative_flows(Scenario::Baseline, &evaluation.baseline)?;
    writer.write_cumulative_flows(Scenario::Investment, &evaluation.investment)?;
    writer.write_scenario_metrics(Scenario::Baseline, &evaluation.baseline_metrics)?;
    writer.write_scenario_metrics(Scenario::Investment, &evaluation.investment_metrics)?;
    writer.write_comparison(&evaluation.comparison)?;
    writer.flush()?;

    log_summary(&evaluation);

    Ok(())
}

/// Narrate the headline results of an evaluation
fn log_summary(evaluation: &Evaluation) {
    info!(
        "Baseline NPV: {} | Investment NPV: {}",
        format_compact_money(evaluation.baseline_metrics.npv),
        format_compact_money(evaluation.investment_metrics.npv)
    );
    info!(
        "NPV uplift: {} ({})",
        format_compact_money(evaluation.comparison.npv_uplift),
        format_fraction(evaluation.comparison.npv_uplift_fraction)
    );
    info!(
        "Baseline IRR: {} | Investment IRR: {}",
        format_fraction(evaluation.baseline_metrics.irr),
        format_fraction(evaluation.investment_metrics.irr)
    );
    info!(
        "Investment payback: {}",
        format_year(evaluation.investment_metrics.payback_year)
    );
    info!(
        "Break-even vs baseline: {}",
        format_year(evaluation.comparison.break_even_year)
    );
    info!(
        "Cumulative advantage over horizon: {}",
        format_compact_money(evaluation.comparison.cumulative_advantage)
    );
}

/// Format a money amount compactly for log output (e.g. "$1.2M", "$680K")
fn format_compact_money(value: Money) -> String {
    let amount = value.value();
    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();
    if magnitude >= 1_000_000.0 {
        format!("{sign}${:.1}M", magnitude / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{sign}${:.0}K", magnitude / 1_000.0)
    } else {
        format!("{sign}${magnitude:.0}")
    }
}

/// Format a rate as a percentage, or "n/a" when it is not computable
fn format_fraction(rate: Option<Dimensionless>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate.value() * 100.0),
        None => "n/a".to_string(),
    }
}

/// Format a fractional year, or "never" when there is none in the horizon
fn format_year(year: Option<Year>) -> String {
    match year {
        Some(year) => format!("year {:.1}", year.value()),
        None => "never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assumptions;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_evaluate_series_lengths(assumptions: Assumptions) {
        let evaluation = evaluate(&assumptions);
        assert_eq!(
            evaluation.baseline.len(),
            assumptions.horizon_years as usize
        );
        assert_eq!(
            evaluation.investment.len(),
            assumptions.horizon_years as usize
        );
    }

    /// Changing only the discount rate must leave the raw series untouched
    /// while changing the NPVs
    #[rstest]
    fn test_discount_rate_changes_only_npv(assumptions: Assumptions) {
        let mut discounted_more = assumptions.clone();
        discounted_more.discount_rate = Dimensionless(0.15);

        let first = evaluate(&assumptions);
        let second = evaluate(&discounted_more);
        assert_eq!(first.baseline, second.baseline);
        assert_eq!(first.investment, second.investment);
        assert_ne!(first.baseline_metrics.npv, second.baseline_metrics.npv);
        assert_ne!(first.investment_metrics.npv, second.investment_metrics.npv);
    }

    #[rstest]
    fn test_run_writes_output_files(assumptions: Assumptions) {
        let dir = tempdir().unwrap();
        run(&assumptions, dir.path()).unwrap();

        for file_name in [
            "annual_cash_flow.csv",
            "cumulative_cash_flow.csv",
            "scenario_metrics.csv",
            "comparison.csv",
        ] {
            assert!(dir.path().join(file_name).is_file(), "missing {file_name}");
        }

        // One row per year per scenario in the annual file (plus the header)
        let line_count = std::fs::read_to_string(dir.path().join("annual_cash_flow.csv"))
            .unwrap()
            .lines()
            .filter(|line| !line.is_empty())
            .count();
        assert_eq!(line_count, 1 + 2 * assumptions.horizon_years as usize);
    }

    #[rstest]
    #[case(680_000.0, "$680K")]
    #[case(1_234_567.0, "$1.2M")]
    #[case(-320_000.0, "-$320K")]
    #[case(999.4, "$999")]
    #[case(0.0, "$0")]
    fn test_format_compact_money(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_compact_money(Money(amount)), expected);
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(Some(Dimensionless(0.1306))), "13.1%");
        assert_eq!(format_fraction(None), "n/a");
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(Some(Year(1.25))), "year 1.2");
        assert_eq!(format_year(None), "never");
    }

    #[rstest]
    fn test_npv_uplift_consistency(assumptions: Assumptions) {
        let evaluation = evaluate(&assumptions);
        assert_approx_eq!(
            f64,
            evaluation.comparison.npv_uplift.value(),
            evaluation.investment_metrics.npv.value() - evaluation.baseline_metrics.npv.value(),
            epsilon = 1e-6
        );
    }
}
