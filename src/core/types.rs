use serde::{Deserialize, Serialize};

use super::error::FireError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Income {
    pub salary: f64,
    pub investments: f64,
    pub side_hustle: f64,
    pub other: f64,
}

impl Income {
    pub fn total(&self) -> f64 {
        self.salary + self.investments + self.side_hustle + self.other
    }

    pub(crate) fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("Salary", self.salary),
            ("Investments", self.investments),
            ("Side Hustle", self.side_hustle),
            ("Other", self.other),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expenses {
    pub housing: f64,
    pub transportation: f64,
    pub food: f64,
    pub utilities: f64,
    pub healthcare: f64,
    pub entertainment: f64,
    pub other: f64,
}

impl Expenses {
    pub fn total(&self) -> f64 {
        self.housing
            + self.transportation
            + self.food
            + self.utilities
            + self.healthcare
            + self.entertainment
            + self.other
    }

    pub(crate) fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("Housing", self.housing),
            ("Transportation", self.transportation),
            ("Food", self.food),
            ("Utilities", self.utilities),
            ("Healthcare", self.healthcare),
            ("Entertainment", self.entertainment),
            ("Other", self.other),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assets {
    pub cash: f64,
    pub investments: f64,
    pub retirement: f64,
    pub real_estate: f64,
    pub other: f64,
}

impl Assets {
    pub fn total(&self) -> f64 {
        self.cash + self.investments + self.retirement + self.real_estate + self.other
    }

    pub(crate) fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("Cash", self.cash),
            ("Investments", self.investments),
            ("Retirement", self.retirement),
            ("Real Estate", self.real_estate),
            ("Other", self.other),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Liabilities {
    pub mortgage: f64,
    pub car_loan: f64,
    pub student_loans: f64,
    pub credit_cards: f64,
    pub other: f64,
}

impl Liabilities {
    pub fn total(&self) -> f64 {
        self.mortgage + self.car_loan + self.student_loans + self.credit_cards + self.other
    }

    pub(crate) fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("Mortgage", self.mortgage),
            ("Car Loan", self.car_loan),
            ("Student Loans", self.student_loans),
            ("Credit Cards", self.credit_cards),
            ("Other", self.other),
        ]
    }
}

/// Retirement goals. `target_withdrawal_rate` is a percentage (4.0 means 4%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Goals {
    pub target_net_worth: f64,
    pub target_annual_expenses: f64,
    pub target_withdrawal_rate: f64,
    pub target_retirement_age: u32,
    pub current_age: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            target_net_worth: 0.0,
            target_annual_expenses: 0.0,
            target_withdrawal_rate: 4.0,
            target_retirement_age: 55,
            current_age: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub income: Income,
    pub expenses: Expenses,
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub goals: Goals,
}

impl FinancialSnapshot {
    pub fn validate(&self) -> Result<(), FireError> {
        check_amounts("income", &self.income.named())?;
        check_amounts("expenses", &self.expenses.named())?;
        check_amounts("assets", &self.assets.named())?;
        check_amounts("liabilities", &self.liabilities.named())?;

        let goals = &self.goals;
        for (name, value) in [
            ("targetNetWorth", goals.target_net_worth),
            ("targetAnnualExpenses", goals.target_annual_expenses),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FireError::Validation(format!(
                    "goals.{name} must be a non-negative amount"
                )));
            }
        }
        if !(0.0..=100.0).contains(&goals.target_withdrawal_rate) {
            return Err(FireError::Validation(
                "goals.targetWithdrawalRate must be between 0 and 100".to_string(),
            ));
        }
        if !(18..=100).contains(&goals.current_age) {
            return Err(FireError::Validation(
                "goals.currentAge must be between 18 and 100".to_string(),
            ));
        }
        if !(18..=120).contains(&goals.target_retirement_age) {
            return Err(FireError::Validation(
                "goals.targetRetirementAge must be between 18 and 120".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_amounts(group: &str, fields: &[(&'static str, f64)]) -> Result<(), FireError> {
    for (name, value) in fields {
        if !value.is_finite() || *value < 0.0 {
            return Err(FireError::Validation(format!(
                "{group}.{name} must be a non-negative amount"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub savings_rate: f64,
}

impl DerivedTotals {
    pub fn monthly_savings(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    pub fn annual_savings(&self) -> f64 {
        self.monthly_savings() * 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub age: u32,
    pub net_worth: f64,
    pub fire_target: f64,
}

/// Market assumptions used by the dashboard projection. Rates are fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assumptions {
    pub annual_return_rate: f64,
    pub inflation_rate: f64,
    pub escalate_contributions: bool,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            annual_return_rate: 0.08,
            inflation_rate: 0.05,
            escalate_contributions: true,
        }
    }
}
