//! A regression test for the "flat" demo
mod regression;
use float_cmp::assert_approx_eq;
use regression::{
    TOLERANCE, assert_flows_eq, read_comparison, read_flows, read_scenario_metrics, run_demo,
};

#[test]
fn test_regression_flat() {
    let (_guard, output_dir) = run_demo("flat");

    // With every rate and cost zeroed, both scenarios are a constant
    // 12 * (120k - 40k) per year
    let expected = [960_000.0; 6];

    let annual = output_dir.join("annual_cash_flow.csv");
    assert_flows_eq(&read_flows(&annual, "baseline"), &expected);
    assert_flows_eq(&read_flows(&annual, "investment"), &expected);

    let metrics_path = output_dir.join("scenario_metrics.csv");
    for scenario in ["baseline", "investment"] {
        let metrics = read_scenario_metrics(&metrics_path, scenario);

        // Zero discount rate: the NPV is the plain sum
        assert_approx_eq!(f64, metrics.npv, 5_760_000.0, epsilon = TOLERANCE);

        // All flows are positive: no IRR, paid back immediately
        assert!(metrics.irr.is_none());
        assert_approx_eq!(f64, metrics.payback_year.unwrap(), 0.0, epsilon = TOLERANCE);
    }

    let comparison = read_comparison(&output_dir.join("comparison.csv"));

    // Identical series never strictly exceed each other
    assert!(comparison.break_even_year.is_none());
    assert_approx_eq!(f64, comparison.cumulative_advantage, 0.0, epsilon = TOLERANCE);
    assert_approx_eq!(f64, comparison.npv_uplift, 0.0, epsilon = TOLERANCE);
    assert_approx_eq!(
        f64,
        comparison.npv_uplift_fraction.unwrap(),
        0.0,
        epsilon = TOLERANCE
    );
    assert!(comparison.irr_improvement.is_none());
}
