//! The business assumptions driving a scenario comparison.
use crate::input::{deserialise_proportion, read_toml};
use crate::units::{Dimensionless, Jobs, Money, MoneyPerJob, Year};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// The default number of model years to evaluate
const DEFAULT_HORIZON_YEARS: u32 = 6;

/// Serde default for [`Assumptions::horizon_years`]
fn default_horizon_years() -> u32 {
    DEFAULT_HORIZON_YEARS
}

/// A complete set of assumptions for one evaluation.
///
/// Values are read from a TOML file and validated once; the rest of the
/// program treats the set as immutable.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Assumptions {
    /// Number of model years to evaluate (years are numbered from 0)
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    /// Discount rate used for present-value calculations
    pub discount_rate: Dimensionless,
    /// Assumptions for the no-investment baseline
    pub baseline: BaselineAssumptions,
    /// The first investment stage
    pub stage1: StageAssumptions,
    /// The second investment stage
    pub stage2: StageAssumptions,
    /// Economics of the investment scenario once stages start completing
    pub investment: InvestmentAssumptions,
}

/// Assumptions describing the business as it runs today.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BaselineAssumptions {
    /// Jobs completed per year at the start of the horizon
    pub jobs_per_year: Jobs,
    /// Revenue earned per job
    pub revenue_per_job: MoneyPerJob,
    /// Cost incurred per job
    pub expense_per_job: MoneyPerJob,
    /// Yearly change in job volume, compounding (negative values model a
    /// declining business)
    pub annual_growth_rate: Dimensionless,
}

/// One stage of the capital investment.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StageAssumptions {
    /// Total cost of the stage
    pub cost: Money,
    /// How long the stage takes to complete, in years (may be fractional)
    pub duration_years: Year,
    /// Fractional increase in job volume once the stage has completed
    pub uplift: Dimensionless,
}

/// Economics applied to the investment scenario.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InvestmentAssumptions {
    /// Yearly revenue growth, compounding from year 0
    pub revenue_growth_rate: Dimensionless,
    /// Flat reduction applied to per-job expenses (not compounding)
    #[serde(deserialize_with = "deserialise_proportion")]
    pub expense_reduction_rate: Dimensionless,
}

impl Assumptions {
    /// Read a set of assumptions from the specified TOML file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the assumptions file
    pub fn from_path(file_path: &Path) -> Result<Assumptions> {
        let assumptions: Assumptions = read_toml(file_path)?;
        assumptions
            .validate()
            .with_context(|| format!("Invalid assumptions in {}", file_path.display()))?;

        if assumptions.stage2.duration_years <= assumptions.stage1.duration_years {
            warn!(
                "Stage 2 finishes no later than stage 1; the intermediate job-volume tier will \
                 never apply"
            );
        }

        Ok(assumptions)
    }

    /// Check that the assumptions satisfy the model's numeric contract
    pub fn validate(&self) -> Result<()> {
        ensure!(self.horizon_years >= 1, "horizon_years must be at least 1");
        ensure!(
            self.discount_rate.value().is_finite() && self.discount_rate.value() >= 0.0,
            "discount_rate must be a non-negative fraction"
        );
        self.baseline.validate()?;
        self.stage1.validate("stage1")?;
        self.stage2.validate("stage2")?;
        self.investment.validate()?;

        Ok(())
    }
}

impl BaselineAssumptions {
    /// Check the baseline assumptions
    fn validate(&self) -> Result<()> {
        ensure!(
            self.jobs_per_year.value().is_finite() && self.jobs_per_year.value() > 0.0,
            "baseline.jobs_per_year must be positive"
        );
        ensure!(
            self.revenue_per_job.value().is_finite() && self.revenue_per_job.value() > 0.0,
            "baseline.revenue_per_job must be positive"
        );
        ensure!(
            self.expense_per_job.value().is_finite() && self.expense_per_job.value() > 0.0,
            "baseline.expense_per_job must be positive"
        );
        ensure!(
            self.annual_growth_rate.value().is_finite(),
            "baseline.annual_growth_rate must be finite"
        );

        Ok(())
    }
}

impl StageAssumptions {
    /// Whether the stage is still in progress during the given model year
    pub fn in_progress(&self, year: u32) -> bool {
        f64::from(year) < self.duration_years.value()
    }

    /// Development cost charged against a single model year while the stage
    /// is in progress.
    ///
    /// The stage's total cost is spread evenly across its duration, so a
    /// stage shorter than a year concentrates its whole cost (and more) into
    /// year 0.
    pub fn annual_charge(&self) -> Money {
        let burn_rate = self.cost / self.duration_years;
        Money(burn_rate.value()) // charged against one whole model year
    }

    /// Check the assumptions for one stage
    fn validate(&self, table: &str) -> Result<()> {
        ensure!(
            self.cost.value().is_finite() && self.cost.value() >= 0.0,
            "{table}.cost must be non-negative"
        );
        ensure!(
            self.duration_years.value().is_finite() && self.duration_years.value() > 0.0,
            "{table}.duration_years must be strictly positive"
        );
        ensure!(
            self.uplift.value().is_finite() && self.uplift.value() >= 0.0,
            "{table}.uplift must be non-negative"
        );

        Ok(())
    }
}

impl InvestmentAssumptions {
    /// Check the investment-scenario economics
    fn validate(&self) -> Result<()> {
        ensure!(
            self.revenue_growth_rate.value().is_finite() && self.revenue_growth_rate.value() >= 0.0,
            "investment.revenue_growth_rate must be a non-negative fraction"
        );
        // The range is also enforced at deserialisation time; this covers
        // sets built in code
        ensure!(
            (0.0..=1.0).contains(&self.expense_reduction_rate.value()),
            "investment.expense_reduction_rate must be between 0 and 1"
        );

        Ok(())
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            horizon_years: DEFAULT_HORIZON_YEARS,
            discount_rate: Dimensionless(0.08),
            baseline: BaselineAssumptions {
                jobs_per_year: Jobs(12.0),
                revenue_per_job: MoneyPerJob(120_000.0),
                expense_per_job: MoneyPerJob(40_000.0),
                annual_growth_rate: Dimensionless(-0.05),
            },
            stage1: StageAssumptions {
                cost: Money(100_000.0),
                duration_years: Year(0.5),
                uplift: Dimensionless(0.2),
            },
            stage2: StageAssumptions {
                cost: Money(300_000.0),
                duration_years: Year(1.5),
                uplift: Dimensionless(0.7),
            },
            investment: InvestmentAssumptions {
                revenue_growth_rate: Dimensionless(0.05),
                expense_reduction_rate: Dimensionless(0.25),
            },
        }
    }
}
