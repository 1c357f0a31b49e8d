//! Fixtures for tests
use crate::assumptions::Assumptions;
use crate::units::{Dimensionless, Money};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The default assumption set used throughout the tests
#[fixture]
pub fn assumptions() -> Assumptions {
    Assumptions::default()
}

/// An assumption set with every growth, uplift and cost input zeroed, so the
/// investment scenario degenerates to the baseline
#[fixture]
pub fn level_assumptions() -> Assumptions {
    let mut assumptions = Assumptions::default();
    assumptions.baseline.annual_growth_rate = Dimensionless(0.0);
    assumptions.stage1.cost = Money(0.0);
    assumptions.stage1.uplift = Dimensionless(0.0);
    assumptions.stage2.cost = Money(0.0);
    assumptions.stage2.uplift = Dimensionless(0.0);
    assumptions.investment.revenue_growth_rate = Dimensionless(0.0);
    assumptions.investment.expense_reduction_rate = Dimensionless(0.0);

    assumptions
}
