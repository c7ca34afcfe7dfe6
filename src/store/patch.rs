use serde::Deserialize;

use crate::core::{
    Assets, CalculatorInputs, Expenses, FinancialSnapshot, Goals, Income, Liabilities,
};

/// A partial snapshot update. Missing fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotPatch {
    pub income: Option<IncomePatch>,
    pub expenses: Option<ExpensesPatch>,
    pub assets: Option<AssetsPatch>,
    pub liabilities: Option<LiabilitiesPatch>,
    pub goals: Option<GoalsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomePatch {
    pub salary: Option<f64>,
    pub investments: Option<f64>,
    pub side_hustle: Option<f64>,
    pub other: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpensesPatch {
    pub housing: Option<f64>,
    pub transportation: Option<f64>,
    pub food: Option<f64>,
    pub utilities: Option<f64>,
    pub healthcare: Option<f64>,
    pub entertainment: Option<f64>,
    pub other: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetsPatch {
    pub cash: Option<f64>,
    pub investments: Option<f64>,
    pub retirement: Option<f64>,
    pub real_estate: Option<f64>,
    pub other: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiabilitiesPatch {
    pub mortgage: Option<f64>,
    pub car_loan: Option<f64>,
    pub student_loans: Option<f64>,
    pub credit_cards: Option<f64>,
    pub other: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalsPatch {
    pub target_net_worth: Option<f64>,
    pub target_annual_expenses: Option<f64>,
    pub target_withdrawal_rate: Option<f64>,
    pub target_retirement_age: Option<u32>,
    pub current_age: Option<u32>,
}

impl SnapshotPatch {
    /// The profile fields the quick calculator writes back.
    pub fn from_calculator(inputs: &CalculatorInputs) -> Self {
        Self {
            assets: Some(AssetsPatch {
                investments: Some(inputs.current_investments),
                ..AssetsPatch::default()
            }),
            goals: Some(GoalsPatch {
                current_age: Some(inputs.current_age),
                target_retirement_age: Some(inputs.target_retirement_age),
                target_annual_expenses: Some(inputs.annual_expenses),
                target_withdrawal_rate: Some(inputs.withdrawal_rate),
                ..GoalsPatch::default()
            }),
            ..SnapshotPatch::default()
        }
    }

    pub fn apply(&self, snapshot: &FinancialSnapshot) -> FinancialSnapshot {
        let mut merged = *snapshot;
        if let Some(patch) = &self.income {
            patch.apply(&mut merged.income);
        }
        if let Some(patch) = &self.expenses {
            patch.apply(&mut merged.expenses);
        }
        if let Some(patch) = &self.assets {
            patch.apply(&mut merged.assets);
        }
        if let Some(patch) = &self.liabilities {
            patch.apply(&mut merged.liabilities);
        }
        if let Some(patch) = &self.goals {
            patch.apply(&mut merged.goals);
        }
        merged
    }
}

impl IncomePatch {
    fn apply(&self, income: &mut Income) {
        if let Some(v) = self.salary {
            income.salary = v;
        }
        if let Some(v) = self.investments {
            income.investments = v;
        }
        if let Some(v) = self.side_hustle {
            income.side_hustle = v;
        }
        if let Some(v) = self.other {
            income.other = v;
        }
    }
}

impl ExpensesPatch {
    fn apply(&self, expenses: &mut Expenses) {
        if let Some(v) = self.housing {
            expenses.housing = v;
        }
        if let Some(v) = self.transportation {
            expenses.transportation = v;
        }
        if let Some(v) = self.food {
            expenses.food = v;
        }
        if let Some(v) = self.utilities {
            expenses.utilities = v;
        }
        if let Some(v) = self.healthcare {
            expenses.healthcare = v;
        }
        if let Some(v) = self.entertainment {
            expenses.entertainment = v;
        }
        if let Some(v) = self.other {
            expenses.other = v;
        }
    }
}

impl AssetsPatch {
    fn apply(&self, assets: &mut Assets) {
        if let Some(v) = self.cash {
            assets.cash = v;
        }
        if let Some(v) = self.investments {
            assets.investments = v;
        }
        if let Some(v) = self.retirement {
            assets.retirement = v;
        }
        if let Some(v) = self.real_estate {
            assets.real_estate = v;
        }
        if let Some(v) = self.other {
            assets.other = v;
        }
    }
}

impl LiabilitiesPatch {
    fn apply(&self, liabilities: &mut Liabilities) {
        if let Some(v) = self.mortgage {
            liabilities.mortgage = v;
        }
        if let Some(v) = self.car_loan {
            liabilities.car_loan = v;
        }
        if let Some(v) = self.student_loans {
            liabilities.student_loans = v;
        }
        if let Some(v) = self.credit_cards {
            liabilities.credit_cards = v;
        }
        if let Some(v) = self.other {
            liabilities.other = v;
        }
    }
}

impl GoalsPatch {
    fn apply(&self, goals: &mut Goals) {
        if let Some(v) = self.target_net_worth {
            goals.target_net_worth = v;
        }
        if let Some(v) = self.target_annual_expenses {
            goals.target_annual_expenses = v;
        }
        if let Some(v) = self.target_withdrawal_rate {
            goals.target_withdrawal_rate = v;
        }
        if let Some(v) = self.target_retirement_age {
            goals.target_retirement_age = v;
        }
        if let Some(v) = self.current_age {
            goals.current_age = v;
        }
    }
}
