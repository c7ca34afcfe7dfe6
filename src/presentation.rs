use serde::{Deserialize, Serialize};

use crate::core::Recommendation;

/// Display symbol only; amounts are never converted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "NGN", alias = "ngn")]
    Ngn,
    #[serde(rename = "GBP", alias = "gbp")]
    Gbp,
    #[serde(rename = "EUR", alias = "eur")]
    Eur,
    #[serde(rename = "USD", alias = "usd")]
    Usd,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Ngn => "₦",
            Currency::Gbp => "£",
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }
}

/// Whole units with a currency symbol and comma grouping, e.g. `₦1,234,568`.
pub fn format_money(value: f64, currency: Currency) -> String {
    if !value.is_finite() {
        return format!("{}-", currency.symbol());
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{}{grouped}", currency.symbol())
}

pub fn render_recommendation(recommendation: &Recommendation, currency: Currency) -> String {
    match recommendation {
        Recommendation::OnTrack { target_age } => {
            format!("You're on track to reach financial independence by age {target_age}!")
        }
        Recommendation::RetireEarlier { years_early } => format!(
            "You might be able to retire {years_early} {} earlier than planned.",
            if *years_early == 1 { "year" } else { "years" }
        ),
        Recommendation::IncreaseSavings {
            monthly_amount,
            target_age,
        } => format!(
            "You need to save an additional {} monthly to reach your FIRE goal by age {target_age}.",
            format_money(*monthly_amount, currency)
        ),
        Recommendation::ReduceExpenses {
            monthly_amount,
            share_of_expenses_pct,
        } => format!(
            "Consider reducing your monthly expenses by {} ({share_of_expenses_pct:.1}% of current expenses).",
            format_money(*monthly_amount, currency)
        ),
        Recommendation::IncreaseIncome { monthly_amount } => format!(
            "Look for ways to increase your income by {} monthly through side hustles, career advancement, or passive income.",
            format_money(*monthly_amount, currency)
        ),
        Recommendation::HorizonElapsed {
            target_age,
            shortfall,
        } => format!(
            "Your target retirement age of {target_age} has already arrived and you are {} short of your FIRE number. Consider a later retirement age.",
            format_money(*shortfall, currency)
        ),
        Recommendation::Diversify { annual_return_pct } => format!(
            "Ensure your investments are properly diversified to manage risk while targeting {annual_return_pct:.0}% annual returns."
        ),
    }
}

pub fn render_recommendations(
    recommendations: &[Recommendation],
    currency: Currency,
) -> Vec<String> {
    recommendations
        .iter()
        .map(|recommendation| render_recommendation(recommendation, currency))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0.0, Currency::Usd), "$0");
        assert_eq!(format_money(999.4, Currency::Usd), "$999");
        assert_eq!(format_money(1_000.0, Currency::Gbp), "£1,000");
        assert_eq!(format_money(1_234_567.6, Currency::Ngn), "₦1,234,568");
        assert_eq!(format_money(-12_345.0, Currency::Eur), "-€12,345");
    }

    #[test]
    fn format_money_marks_non_finite_values() {
        assert_eq!(format_money(f64::INFINITY, Currency::Usd), "$-");
    }

    #[test]
    fn currency_uses_iso_codes_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&Currency::Gbp).expect("serialize"),
            "\"GBP\""
        );
        let parsed: Currency = serde_json::from_str("\"usd\"").expect("alias parses");
        assert_eq!(parsed, Currency::Usd);
        assert_eq!(Currency::default(), Currency::Ngn);
    }

    #[test]
    fn recommendations_render_with_symbol_and_precision() {
        let rendered = render_recommendations(
            &[
                Recommendation::IncreaseSavings {
                    monthly_amount: 1_500.4,
                    target_age: 55,
                },
                Recommendation::ReduceExpenses {
                    monthly_amount: 80.0,
                    share_of_expenses_pct: 10.0,
                },
                Recommendation::RetireEarlier { years_early: 1 },
                Recommendation::Diversify {
                    annual_return_pct: 8.0,
                },
            ],
            Currency::Usd,
        );
        assert_eq!(
            rendered[0],
            "You need to save an additional $1,500 monthly to reach your FIRE goal by age 55."
        );
        assert_eq!(
            rendered[1],
            "Consider reducing your monthly expenses by $80 (10.0% of current expenses)."
        );
        assert_eq!(
            rendered[2],
            "You might be able to retire 1 year earlier than planned."
        );
        assert!(rendered[3].contains("targeting 8% annual returns"));
    }
}
