//! Summary metrics derived from cash-flow series.
use crate::finance::{break_even_year, internal_rate_of_return, payback_year, present_value};
use crate::scenario::CashFlowSeries;
use crate::units::{Dimensionless, Money, Year};

/// Summary metrics for a single scenario's cash-flow series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioMetrics {
    /// Net present value of the series at the evaluation discount rate
    pub npv: Money,
    /// Internal rate of return, when one is computable for the series
    pub irr: Option<Dimensionless>,
    /// Fractional year at which the cumulative cash flow first becomes
    /// non-negative, when it does so within the horizon
    pub payback_year: Option<Year>,
}

impl ScenarioMetrics {
    /// Derive the summary metrics for one series.
    pub fn from_series(series: &CashFlowSeries, discount_rate: Dimensionless) -> Self {
        Self {
            npv: present_value(series.values(), discount_rate),
            irr: internal_rate_of_return(series.values()),
            payback_year: payback_year(&series.cumulative()),
        }
    }
}

/// Metrics comparing the investment scenario against the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonMetrics {
    /// Fractional year at which the investment scenario's cumulative cash
    /// flow first strictly exceeds the baseline's, when it does so within
    /// the horizon
    pub break_even_year: Option<Year>,
    /// Total investment-scenario cash flow minus total baseline cash flow
    /// over the horizon
    pub cumulative_advantage: Money,
    /// Investment NPV minus baseline NPV
    pub npv_uplift: Money,
    /// NPV uplift as a fraction of the baseline NPV; only defined when the
    /// baseline NPV is positive
    pub npv_uplift_fraction: Option<Dimensionless>,
    /// Investment IRR minus baseline IRR; only defined when both rates are
    /// computable
    pub irr_improvement: Option<Dimensionless>,
}

impl ComparisonMetrics {
    /// Derive the cross-scenario metrics from the two series and their
    /// summary metrics.
    pub fn new(
        baseline: &CashFlowSeries,
        investment: &CashFlowSeries,
        baseline_metrics: &ScenarioMetrics,
        investment_metrics: &ScenarioMetrics,
    ) -> Self {
        let npv_uplift = investment_metrics.npv - baseline_metrics.npv;

        // Dividing by a non-positive baseline NPV would produce a
        // meaningless (or non-finite) percentage
        let npv_uplift_fraction =
            (baseline_metrics.npv > Money(0.0)).then(|| npv_uplift / baseline_metrics.npv);

        let irr_improvement = investment_metrics
            .irr
            .zip(baseline_metrics.irr)
            .map(|(investment_irr, baseline_irr)| investment_irr - baseline_irr);

        Self {
            break_even_year: break_even_year(&baseline.cumulative(), &investment.cumulative()),
            cumulative_advantage: investment.total() - baseline.total(),
            npv_uplift,
            npv_uplift_fraction,
            irr_improvement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn series(values: &[f64]) -> CashFlowSeries {
        CashFlowSeries(values.iter().copied().map(Money).collect())
    }

    #[rstest]
    fn test_scenario_metrics_zero_rate() {
        let metrics = ScenarioMetrics::from_series(
            &series(&[-100.0, 60.0, 60.0]),
            Dimensionless(0.0),
        );
        assert_approx_eq!(f64, metrics.npv.value(), 20.0, epsilon = 1e-9);
        assert!(metrics.irr.is_some());
        // Cumulative flows are -100, -40, 20: recovery midway through year 2
        assert_approx_eq!(
            f64,
            metrics.payback_year.unwrap().value(),
            1.0 + 40.0 / 60.0,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_scenario_metrics_undefined_irr() {
        let metrics = ScenarioMetrics::from_series(&series(&[100.0, 100.0]), Dimensionless(0.1));
        assert_eq!(metrics.irr, None);
        assert_eq!(metrics.payback_year, Some(Year(0.0)));
    }

    #[rstest]
    fn test_comparison_metrics() {
        let baseline = series(&[100.0, 100.0, 100.0]);
        let investment = series(&[-100.0, 200.0, 400.0]);
        let discount_rate = Dimensionless(0.0);
        let baseline_metrics = ScenarioMetrics::from_series(&baseline, discount_rate);
        let investment_metrics = ScenarioMetrics::from_series(&investment, discount_rate);

        let comparison = ComparisonMetrics::new(
            &baseline,
            &investment,
            &baseline_metrics,
            &investment_metrics,
        );
        assert_approx_eq!(f64, comparison.cumulative_advantage.value(), 200.0);
        assert_approx_eq!(f64, comparison.npv_uplift.value(), 200.0);
        // 200 uplift on a baseline NPV of 300
        assert_approx_eq!(
            f64,
            comparison.npv_uplift_fraction.unwrap().value(),
            200.0 / 300.0,
            epsilon = 1e-9
        );
        // Baseline cumulative: 100, 200, 300; investment: -100, 100, 500
        assert_approx_eq!(
            f64,
            comparison.break_even_year.unwrap().value(),
            1.0 + 100.0 / 300.0,
            epsilon = 1e-9
        );
        // The baseline series has no sign change, so no IRR improvement
        assert_eq!(comparison.irr_improvement, None);
    }

    #[rstest]
    fn test_npv_uplift_fraction_guard() {
        // Baseline NPV is negative: the relative uplift is not reported
        let baseline = series(&[-100.0, -100.0]);
        let investment = series(&[50.0, 50.0]);
        let discount_rate = Dimensionless(0.0);
        let baseline_metrics = ScenarioMetrics::from_series(&baseline, discount_rate);
        let investment_metrics = ScenarioMetrics::from_series(&investment, discount_rate);

        let comparison = ComparisonMetrics::new(
            &baseline,
            &investment,
            &baseline_metrics,
            &investment_metrics,
        );
        assert_eq!(comparison.npv_uplift_fraction, None);
        assert_approx_eq!(f64, comparison.npv_uplift.value(), 300.0);
    }
}
