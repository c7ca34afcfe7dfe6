use super::error::FireError;
use super::types::Goals;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Horizon {
    Remaining(u32),
    Elapsed,
}

impl Horizon {
    pub fn between(current_age: u32, target_age: u32) -> Self {
        match target_age.checked_sub(current_age) {
            Some(years) if years > 0 => Horizon::Remaining(years),
            _ => Horizon::Elapsed,
        }
    }

    pub fn years(self) -> u32 {
        match self {
            Horizon::Remaining(years) => years,
            Horizon::Elapsed => 0,
        }
    }
}

pub fn fi_number(goals: &Goals) -> Result<f64, FireError> {
    fi_number_for(goals.target_annual_expenses, goals.target_withdrawal_rate)
}

pub fn fi_number_for(annual_expenses: f64, withdrawal_rate_pct: f64) -> Result<f64, FireError> {
    if withdrawal_rate_pct == 0.0 {
        return Err(FireError::ZeroWithdrawalRate);
    }
    if !withdrawal_rate_pct.is_finite() || withdrawal_rate_pct < 0.0 {
        return Err(FireError::Validation(
            "withdrawal rate must be between 0 and 100".to_string(),
        ));
    }
    Ok(annual_expenses * (100.0 / withdrawal_rate_pct))
}

pub fn required_contribution(
    current_amount: f64,
    target_amount: f64,
    horizon_periods: u32,
    periodic_rate: f64,
) -> f64 {
    if horizon_periods == 0 {
        return 0.0;
    }

    let periods = horizon_periods as f64;
    let growth = (1.0 + periodic_rate).powf(periods);
    let future_value = current_amount * growth;
    let deficit = (target_amount - future_value).max(0.0);

    // Rates too small to move 1.0 + r behave as zero.
    if growth == 1.0 {
        return deficit / periods;
    }

    let payment = deficit * periodic_rate * growth / (growth - 1.0);
    payment.max(0.0)
}

/// `annual_rate` is a fraction (0.08 for 8%).
pub fn monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

pub fn required_monthly_contribution(
    current_amount: f64,
    target_amount: f64,
    horizon: Horizon,
    annual_rate: f64,
) -> f64 {
    required_contribution(
        current_amount,
        target_amount,
        horizon.years().saturating_mul(12),
        monthly_rate(annual_rate),
    )
}

pub fn required_annual_contribution(
    current_amount: f64,
    target_amount: f64,
    horizon: Horizon,
    annual_rate: f64,
) -> f64 {
    required_contribution(current_amount, target_amount, horizon.years(), annual_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn horizon_between_ages() {
        assert_eq!(Horizon::between(30, 55), Horizon::Remaining(25));
        assert_eq!(Horizon::between(55, 55), Horizon::Elapsed);
        assert_eq!(Horizon::between(60, 55), Horizon::Elapsed);
        assert_eq!(Horizon::Elapsed.years(), 0);
    }

    #[test]
    fn fi_number_uses_withdrawal_rate_percent() {
        let goals = Goals {
            target_annual_expenses: 3_600_000.0,
            target_withdrawal_rate: 4.0,
            ..Goals::default()
        };
        assert_close(fi_number(&goals).expect("valid rate"), 90_000_000.0, 1e-6);
        assert_close(fi_number_for(40_000.0, 3.5).expect("valid rate"), 1_142_857.142857, 1e-3);
    }

    #[test]
    fn fi_number_rejects_zero_withdrawal_rate() {
        let goals = Goals {
            target_annual_expenses: 1_000.0,
            target_withdrawal_rate: 0.0,
            ..Goals::default()
        };
        assert_eq!(fi_number(&goals), Err(FireError::ZeroWithdrawalRate));
    }

    #[test]
    fn fi_number_rejects_negative_or_nan_rate() {
        assert!(matches!(
            fi_number_for(1_000.0, -4.0),
            Err(FireError::Validation(_))
        ));
        assert!(matches!(
            fi_number_for(1_000.0, f64::NAN),
            Err(FireError::Validation(_))
        ));
    }

    #[test]
    fn zero_rate_contribution_is_simple_division() {
        assert_close(required_contribution(0.0, 120_000.0, 10, 0.0), 12_000.0, 1e-9);
    }

    #[test]
    fn negligible_rate_falls_back_to_division() {
        let value = required_contribution(0.0, 1_000.0, 10, 1e-17);
        assert!(value.is_finite());
        assert_close(value, 100.0, 1e-9);
    }

    #[test]
    fn already_funded_needs_no_contribution() {
        assert_eq!(required_contribution(100_000.0, 100_000.0, 5, 0.08), 0.0);
        assert_eq!(required_contribution(500_000.0, 100_000.0, 5, 0.0), 0.0);
    }

    #[test]
    fn empty_horizon_needs_no_contribution() {
        assert_eq!(required_contribution(0.0, 1_000_000.0, 0, 0.08), 0.0);
        assert_eq!(
            required_monthly_contribution(0.0, 1_000_000.0, Horizon::Elapsed, 0.08),
            0.0
        );
        assert_eq!(
            required_annual_contribution(0.0, 1_000_000.0, Horizon::Elapsed, 0.08),
            0.0
        );
    }

    #[test]
    fn contribution_matches_hand_calculation() {
        // deficit = 1000 - 0 = 1000, growth = 1.1^2 = 1.21
        // payment = 1000 * 0.1 * 1.21 / 0.21 = 576.190476...
        assert_close(required_contribution(0.0, 1_000.0, 2, 0.10), 576.190_476_190, 1e-6);

        // fv of 500 over 2 periods = 605, deficit = 395
        // payment = 395 * 0.1 * 1.21 / 0.21 = 227.595238...
        assert_close(required_contribution(500.0, 1_000.0, 2, 0.10), 227.595_238_095, 1e-6);
    }

    #[test]
    fn monthly_rate_compounds_back_to_annual() {
        let monthly = monthly_rate(0.08);
        assert_close((1.0 + monthly).powi(12) - 1.0, 0.08, 1e-12);
        assert_eq!(monthly_rate(0.0), 0.0);
    }

    #[test]
    fn monthly_and_annual_entry_points_use_their_granularity() {
        let horizon = Horizon::Remaining(10);
        assert_close(
            required_monthly_contribution(0.0, 120_000.0, horizon, 0.0),
            1_000.0,
            1e-9,
        );
        assert_close(
            required_annual_contribution(0.0, 120_000.0, horizon, 0.0),
            12_000.0,
            1e-9,
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_contribution_is_finite_and_non_negative(
            current in 0u32..10_000_000,
            target in 0u32..100_000_000,
            periods in 0u32..600,
            rate_bp in 0u32..2_000
        ) {
            let value = required_contribution(
                current as f64,
                target as f64,
                periods,
                rate_bp as f64 / 10_000.0,
            );
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }

        #[test]
        fn prop_contribution_paid_every_period_reaches_target(
            current in 0u32..1_000_000,
            target in 0u32..10_000_000,
            periods in 1u32..60,
            rate_bp in 0u32..1_500
        ) {
            let rate = rate_bp as f64 / 10_000.0;
            let payment = required_contribution(current as f64, target as f64, periods, rate);
            let mut balance = current as f64;
            for _ in 0..periods {
                balance = balance * (1.0 + rate) + payment;
            }
            prop_assert!(balance + 1e-6 * (target as f64).max(1.0) >= target as f64);
        }
    }
}
