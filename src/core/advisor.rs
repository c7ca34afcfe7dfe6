use serde::Serialize;

use super::projection::{YearsToTarget, years_to_target};
use super::solver::{Horizon, required_monthly_contribution};
use super::types::{Assumptions, DerivedTotals, Goals, ProjectionPoint};

const AHEAD_OF_TARGET_MARGIN: f64 = 1.2;
// Fraction of monthly expenses.
const MAX_EXPENSE_CUT: f64 = 0.10;

/// Amounts are monthly, in the snapshot's currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Recommendation {
    #[serde(rename_all = "camelCase")]
    OnTrack { target_age: u32 },
    #[serde(rename_all = "camelCase")]
    RetireEarlier { years_early: u32 },
    #[serde(rename_all = "camelCase")]
    IncreaseSavings { monthly_amount: f64, target_age: u32 },
    #[serde(rename_all = "camelCase")]
    ReduceExpenses {
        monthly_amount: f64,
        share_of_expenses_pct: f64,
    },
    #[serde(rename_all = "camelCase")]
    IncreaseIncome { monthly_amount: f64 },
    #[serde(rename_all = "camelCase")]
    HorizonElapsed { target_age: u32, shortfall: f64 },
    #[serde(rename_all = "camelCase")]
    Diversify { annual_return_pct: f64 },
}

pub fn recommend(
    totals: &DerivedTotals,
    fire_target: f64,
    projection: &[ProjectionPoint],
    goals: &Goals,
    assumptions: &Assumptions,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let target_age = goals.target_retirement_age;
    let horizon = Horizon::between(goals.current_age, target_age);
    let final_net_worth = projection
        .last()
        .map(|point| point.net_worth)
        .unwrap_or(totals.net_worth);

    if final_net_worth >= fire_target {
        recommendations.push(Recommendation::OnTrack { target_age });

        if final_net_worth > fire_target * AHEAD_OF_TARGET_MARGIN {
            let reached = years_to_target(
                totals.net_worth,
                fire_target,
                totals.annual_savings(),
                assumptions.annual_return_rate,
            );
            if let YearsToTarget::Years(years) = reached {
                if years < horizon.years() {
                    recommendations.push(Recommendation::RetireEarlier {
                        years_early: horizon.years() - years,
                    });
                }
            }
        }
    } else {
        match horizon {
            Horizon::Elapsed => {
                recommendations.push(Recommendation::HorizonElapsed {
                    target_age,
                    shortfall: fire_target - final_net_worth,
                });
            }
            Horizon::Remaining(_) => {
                let monthly_amount = required_additional_monthly(
                    totals.net_worth,
                    final_net_worth,
                    fire_target,
                    horizon,
                    assumptions.annual_return_rate,
                );
                recommendations.push(Recommendation::IncreaseSavings {
                    monthly_amount,
                    target_age,
                });

                if totals.total_expenses > 0.0 {
                    let cut = (totals.total_expenses * MAX_EXPENSE_CUT).min(monthly_amount);
                    recommendations.push(Recommendation::ReduceExpenses {
                        monthly_amount: cut,
                        share_of_expenses_pct: cut / totals.total_expenses * 100.0,
                    });
                }

                recommendations.push(Recommendation::IncreaseIncome { monthly_amount });
            }
        }
    }

    recommendations.push(Recommendation::Diversify {
        annual_return_pct: assumptions.annual_return_rate * 100.0,
    });
    recommendations
}

// Funds the projected shortfall instead when net worth alone would clear the
// target but negative savings keep the plan short.
pub(crate) fn required_additional_monthly(
    net_worth: f64,
    final_net_worth: f64,
    fire_target: f64,
    horizon: Horizon,
    annual_rate: f64,
) -> f64 {
    let from_net_worth = required_monthly_contribution(net_worth, fire_target, horizon, annual_rate);
    if from_net_worth > 0.0 || final_net_worth >= fire_target {
        return from_net_worth;
    }
    required_monthly_contribution(0.0, fire_target - final_net_worth, horizon, annual_rate)
}
