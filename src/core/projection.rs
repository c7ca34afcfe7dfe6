use super::types::ProjectionPoint;

pub const MAX_PROJECTION_STEPS: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ContributionGrowth {
    Flat,
    Escalating(f64),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectionConfig {
    pub current_age: u32,
    pub end_age: u32,
    pub starting_net_worth: f64,
    pub periodic_contribution: f64,
    pub periodic_return_rate: f64,
    pub fire_target: f64,
    pub contribution_growth: ContributionGrowth,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum YearsToTarget {
    Years(u32),
    Unreachable,
}

impl YearsToTarget {
    pub fn years(self) -> Option<u32> {
        match self {
            YearsToTarget::Years(years) => Some(years),
            YearsToTarget::Unreachable => None,
        }
    }
}

fn compound_step(net_worth: f64, contribution: f64, rate: f64) -> f64 {
    net_worth * (1.0 + rate) + contribution
}

pub fn project(config: &ProjectionConfig) -> Vec<ProjectionPoint> {
    let span = config.end_age.saturating_sub(config.current_age);
    let steps = if span >= MAX_PROJECTION_STEPS {
        log::debug!(
            "projection from age {} to {} capped at {MAX_PROJECTION_STEPS} points",
            config.current_age,
            config.end_age
        );
        MAX_PROJECTION_STEPS
    } else {
        span + 1
    };

    let mut points = Vec::with_capacity(steps as usize);
    let mut net_worth = config.starting_net_worth;
    let mut contribution = config.periodic_contribution;

    for offset in 0..steps {
        points.push(ProjectionPoint {
            age: config.current_age + offset,
            net_worth,
            fire_target: config.fire_target,
        });

        net_worth = compound_step(net_worth, contribution, config.periodic_return_rate);
        if let ContributionGrowth::Escalating(rate) = config.contribution_growth {
            contribution *= 1.0 + rate;
        }
    }

    points
}

pub fn years_to_target(
    current_net_worth: f64,
    target_amount: f64,
    periodic_contribution: f64,
    periodic_return_rate: f64,
) -> YearsToTarget {
    if current_net_worth >= target_amount {
        return YearsToTarget::Years(0);
    }
    if periodic_contribution <= 0.0 && periodic_return_rate <= 0.0 {
        return YearsToTarget::Unreachable;
    }

    let mut years = 0;
    let mut net_worth = current_net_worth;
    while net_worth < target_amount && years < MAX_PROJECTION_STEPS {
        net_worth = compound_step(net_worth, periodic_contribution, periodic_return_rate);
        years += 1;
    }

    if net_worth >= target_amount {
        YearsToTarget::Years(years)
    } else {
        YearsToTarget::Unreachable
    }
}
