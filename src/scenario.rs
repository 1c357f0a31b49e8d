//! Derivation of annual cash-flow series from a set of assumptions.
use crate::assumptions::Assumptions;
use crate::units::{Dimensionless, Money};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// The two scenarios being compared.
#[derive(Debug, Clone, Copy, PartialEq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum)]
pub enum Scenario {
    /// The business as it runs today, with no investment
    #[string = "baseline"]
    Baseline,
    /// The staged capital-investment scenario
    #[string = "investment"]
    Investment,
}

/// Net cash flow per model year, one entry per year from year 0.
///
/// A series is always derived from an [`Assumptions`] value and recomputed
/// whenever the assumptions change; it is never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSeries(pub Vec<Money>);

impl CashFlowSeries {
    /// The annual cash-flow values, ordered by year
    pub fn values(&self) -> &[Money] {
        &self.0
    }

    /// The running sum of the annual cash flows
    pub fn cumulative(&self) -> Vec<Money> {
        let mut total = Money(0.0);
        self.0
            .iter()
            .map(|flow| {
                total += *flow;
                total
            })
            .collect()
    }

    /// The sum of all annual cash flows over the horizon
    pub fn total(&self) -> Money {
        let mut total = Money(0.0);
        for flow in &self.0 {
            total += *flow;
        }

        total
    }

    /// The number of years in the series
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series contains no years
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Calculate the annual cash flows of the no-investment baseline.
///
/// Job volume starts at `jobs_per_year` and compounds by the annual growth
/// rate each subsequent year. Per-job revenue and expense stay constant
/// across the horizon.
pub fn baseline_series(assumptions: &Assumptions) -> CashFlowSeries {
    let base = &assumptions.baseline;
    let growth = Dimensionless(1.0) + base.annual_growth_rate;

    let mut jobs = base.jobs_per_year;
    let mut flows = Vec::with_capacity(assumptions.horizon_years as usize);
    for year in 0..assumptions.horizon_years {
        if year > 0 {
            jobs = jobs * growth;
        }
        let revenue = jobs * base.revenue_per_job;
        let expenses = jobs * base.expense_per_job;
        flows.push(revenue - expenses);
    }

    CashFlowSeries(flows)
}

/// Calculate the annual cash flows of the staged-investment scenario.
///
/// Job volume steps up a tier as each stage completes, revenue compounds by
/// the post-investment growth rate from year 0, expenses are reduced by a
/// flat factor, and each stage's cost is amortised evenly across the years
/// inside its duration window.
pub fn investment_series(assumptions: &Assumptions) -> CashFlowSeries {
    let base = &assumptions.baseline;
    let stage1 = &assumptions.stage1;
    let stage2 = &assumptions.stage2;
    let price_growth = Dimensionless(1.0) + assumptions.investment.revenue_growth_rate;
    let expense_factor = Dimensionless(1.0) - assumptions.investment.expense_reduction_rate;

    let mut flows = Vec::with_capacity(assumptions.horizon_years as usize);
    for year in 0..assumptions.horizon_years {
        // The middle tier is keyed on stage 2's own duration rather than the
        // cumulative stage1 + stage2 boundary, so a stage 2 that finishes no
        // later than stage 1 skips the tier entirely.
        // TODO: confirm with the product owner whether the stage 2 window
        // should instead open once stage 1 completes.
        let jobs = if stage1.in_progress(year) {
            base.jobs_per_year
        } else if stage2.in_progress(year) {
            base.jobs_per_year * (Dimensionless(1.0) + stage1.uplift)
        } else {
            base.jobs_per_year * (Dimensionless(1.0) + stage1.uplift + stage2.uplift)
        };

        let revenue = jobs * base.revenue_per_job * price_growth.powi(year as i32);
        let expenses = jobs * base.expense_per_job * expense_factor;

        let mut development_cost = Money(0.0);
        if stage1.in_progress(year) {
            development_cost += stage1.annual_charge();
        }
        if stage2.in_progress(year) {
            development_cost += stage2.annual_charge();
        }

        flows.push(revenue - expenses - development_cost);
    }

    CashFlowSeries(flows)
}
