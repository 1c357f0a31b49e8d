//! General functions related to finance.
use crate::units::{Dimensionless, Money, Year};
use float_cmp::approx_eq;
use itertools::Itertools;

/// Lower bound of the IRR search domain (just above a total loss of -100%)
pub const IRR_RATE_MIN: f64 = -0.99;

/// Upper bound of the IRR search domain (a 1000% annual return)
pub const IRR_RATE_MAX: f64 = 10.0;

/// Iteration budget for the IRR bisection
const IRR_MAX_ITERATIONS: u32 = 100;

/// Width of the rate bracket below which the bisection is considered
/// converged
const IRR_RATE_TOLERANCE: f64 = 1e-9;

/// Calculates the present value of a cash-flow series at the given discount
/// rate.
///
/// Each year's flow is discounted by `(1 + rate)^year` counting from year 0,
/// so the year-0 flow is included undiscounted.
pub fn present_value(flows: &[Money], discount_rate: Dimensionless) -> Money {
    let factor = Dimensionless(1.0) + discount_rate;

    let mut total = Money(0.0);
    for (year, flow) in flows.iter().enumerate() {
        total += *flow / factor.powi(year as i32);
    }

    total
}

/// Calculates the internal rate of return of a cash-flow series: the
/// discount rate at which its present value is zero.
///
/// The root is found by bisection over the domain [`IRR_RATE_MIN`],
/// [`IRR_RATE_MAX`]. Returns `None` when no rate can be computed: the series
/// never changes sign, the domain endpoints do not bracket a root, or the
/// iteration budget runs out before the bracket converges. Callers must
/// treat `None` as "not computable", not as a rate of zero.
pub fn internal_rate_of_return(flows: &[Money]) -> Option<Dimensionless> {
    // A root can only exist if the series contains both in- and outflows
    let has_inflow = flows.iter().any(|flow| *flow > Money(0.0));
    let has_outflow = flows.iter().any(|flow| *flow < Money(0.0));
    if !has_inflow || !has_outflow {
        return None;
    }

    let mut low = IRR_RATE_MIN;
    let mut high = IRR_RATE_MAX;
    let npv_low = present_value(flows, Dimensionless(low));
    let npv_high = present_value(flows, Dimensionless(high));
    if !npv_low.value().is_finite() || !npv_high.value().is_finite() {
        return None;
    }

    // Bisection requires the domain endpoints to bracket the root
    if npv_low.value().signum() == npv_high.value().signum() {
        return None;
    }

    let low_is_positive = npv_low > Money(0.0);
    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = present_value(flows, Dimensionless(mid));
        if approx_eq!(f64, npv_mid.value(), 0.0, ulps = 2) {
            return Some(Dimensionless(mid));
        }

        if (npv_mid > Money(0.0)) == low_is_positive {
            low = mid;
        } else {
            high = mid;
        }

        if high - low < IRR_RATE_TOLERANCE {
            return Some(Dimensionless((low + high) / 2.0));
        }
    }

    None
}

/// Finds the fractional year at which a cumulative cash-flow series first
/// becomes non-negative.
///
/// Returns `Year(0.0)` when the series starts non-negative, and `None` when
/// it stays negative for the whole horizon.
pub fn payback_year(cumulative: &[Money]) -> Option<Year> {
    first_crossing(cumulative, |value| value >= Money(0.0))
}

/// Finds the fractional year at which the investment scenario's cumulative
/// cash flow first strictly exceeds the baseline's.
///
/// Returns `None` when the investment scenario never pulls ahead within the
/// horizon.
pub fn break_even_year(
    baseline_cumulative: &[Money],
    investment_cumulative: &[Money],
) -> Option<Year> {
    let advantage: Vec<Money> = investment_cumulative
        .iter()
        .zip(baseline_cumulative)
        .map(|(investment, baseline)| *investment - *baseline)
        .collect();

    first_crossing(&advantage, |value| value > Money(0.0))
}

/// Fractional year at which `series` first satisfies `crossed`, linearly
/// interpolating between the last year before the crossing and the first
/// year after it
fn first_crossing(series: &[Money], crossed: impl Fn(Money) -> bool) -> Option<Year> {
    if crossed(*series.first()?) {
        return Some(Year(0.0));
    }

    let (index, (before, after)) = series
        .iter()
        .copied()
        .tuple_windows()
        .find_position(|(_, after)| crossed(*after))?;

    // The step is strictly positive because the series crosses the threshold
    // inside this window
    let fraction = -before / (after - before);

    Some(Year(index as f64 + fraction.value()))
}
