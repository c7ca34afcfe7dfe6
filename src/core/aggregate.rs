use serde::Serialize;

use super::types::{DerivedTotals, FinancialSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub income: Vec<BreakdownEntry>,
    pub expenses: Vec<BreakdownEntry>,
    pub assets: Vec<BreakdownEntry>,
    pub liabilities: Vec<BreakdownEntry>,
}

pub fn aggregate(snapshot: &FinancialSnapshot) -> DerivedTotals {
    let total_income = snapshot.income.total();
    let total_expenses = snapshot.expenses.total();
    let total_assets = snapshot.assets.total();
    let total_liabilities = snapshot.liabilities.total();

    let savings_rate = if total_income > 0.0 {
        (total_income - total_expenses) / total_income * 100.0
    } else {
        0.0
    };

    DerivedTotals {
        total_income,
        total_expenses,
        total_assets,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
        savings_rate,
    }
}

/// Percentage (0-100+), not a fraction.
pub fn fire_progress(net_worth: f64, fi_number: f64) -> f64 {
    if fi_number > 0.0 {
        net_worth / fi_number * 100.0
    } else {
        0.0
    }
}

pub fn breakdown(snapshot: &FinancialSnapshot) -> CategoryBreakdown {
    CategoryBreakdown {
        income: non_zero_entries(&snapshot.income.named()),
        expenses: non_zero_entries(&snapshot.expenses.named()),
        assets: non_zero_entries(&snapshot.assets.named()),
        liabilities: non_zero_entries(&snapshot.liabilities.named()),
    }
}

fn non_zero_entries(fields: &[(&'static str, f64)]) -> Vec<BreakdownEntry> {
    fields
        .iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|&(name, value)| BreakdownEntry { name, value })
        .collect()
}
