mod advisor;
mod aggregate;
mod calculator;
mod dashboard;
mod error;
mod projection;
mod solver;
mod types;

pub use advisor::{Recommendation, recommend};
pub use aggregate::{BreakdownEntry, CategoryBreakdown, aggregate, breakdown, fire_progress};
pub use calculator::{CalculatorInputs, CalculatorResult, run_calculator};
pub use dashboard::{DashboardReport, build_dashboard};
pub use error::FireError;
pub use projection::{
    ContributionGrowth, MAX_PROJECTION_STEPS, ProjectionConfig, YearsToTarget, project,
    years_to_target,
};
pub use solver::{
    Horizon, fi_number, fi_number_for, monthly_rate, required_annual_contribution,
    required_contribution, required_monthly_contribution,
};
pub use types::{
    Assets, Assumptions, DerivedTotals, Expenses, FinancialSnapshot, Goals, Income, Liabilities,
    ProjectionPoint,
};
