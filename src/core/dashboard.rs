use serde::Serialize;

use super::advisor::{Recommendation, recommend, required_additional_monthly};
use super::aggregate::{CategoryBreakdown, aggregate, breakdown, fire_progress};
use super::error::FireError;
use super::projection::{ContributionGrowth, ProjectionConfig, project};
use super::solver::{Horizon, fi_number};
use super::types::{Assumptions, DerivedTotals, FinancialSnapshot, ProjectionPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub totals: DerivedTotals,
    pub fi_number: f64,
    pub fire_progress: f64,
    pub years_to_retirement: u32,
    pub required_monthly_investment: f64,
    pub projection: Vec<ProjectionPoint>,
    pub breakdown: CategoryBreakdown,
    pub recommendations: Vec<Recommendation>,
}

pub fn build_dashboard(
    snapshot: &FinancialSnapshot,
    assumptions: &Assumptions,
) -> Result<DashboardReport, FireError> {
    snapshot.validate()?;

    let goals = &snapshot.goals;
    let totals = aggregate(snapshot);
    let fi_number = fi_number(goals)?;
    let horizon = Horizon::between(goals.current_age, goals.target_retirement_age);

    let contribution_growth = if assumptions.escalate_contributions {
        ContributionGrowth::Escalating(assumptions.inflation_rate)
    } else {
        ContributionGrowth::Flat
    };
    let projection = project(&ProjectionConfig {
        current_age: goals.current_age,
        end_age: goals.target_retirement_age,
        starting_net_worth: totals.net_worth,
        periodic_contribution: totals.annual_savings(),
        periodic_return_rate: assumptions.annual_return_rate,
        fire_target: fi_number,
        contribution_growth,
    });

    let final_net_worth = projection
        .last()
        .map(|point| point.net_worth)
        .unwrap_or(totals.net_worth);
    let required_monthly_investment = required_additional_monthly(
        totals.net_worth,
        final_net_worth,
        fi_number,
        horizon,
        assumptions.annual_return_rate,
    );
    let recommendations = recommend(&totals, fi_number, &projection, goals, assumptions);

    Ok(DashboardReport {
        totals,
        fi_number,
        fire_progress: fire_progress(totals.net_worth, fi_number),
        years_to_retirement: horizon.years(),
        required_monthly_investment,
        projection,
        breakdown: breakdown(snapshot),
        recommendations,
    })
}
