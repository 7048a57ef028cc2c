use thiserror::Error;

use super::profile::{Expense, Investment};

/// Validation failures surfaced inline next to the offending step. These are
/// returned values that block the "Next"/"Save" action, never panics.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("your monthly expenses ({total}) exceed your monthly income ({income})")]
    OverBudget { total: f64, income: f64 },
    #[error("your investment amount ({total}) exceeds the available balance ({available})")]
    OverInvest { total: f64, available: f64 },
    #[error("please select a risk level or enter a fixed return rate")]
    MissingRiskSelection,
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be a number")]
    InvalidNumber { field: &'static str },
    #[error("monthly income must be positive")]
    NonPositiveIncome,
    #[error("total asset must be zero or positive")]
    NegativeAsset,
    #[error("unknown investment type: {0}")]
    UnknownInvestmentKind(String),
    #[error("event month index must be at least 1")]
    InvalidEventMonth,
}

/// Flags an error iff the expense total exceeds monthly income. Pure;
/// re-evaluated on every row edit so the error can be shown live.
pub fn validate_expenses(expenses: &[Expense], monthly_income: f64) -> Result<(), ValidationError> {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    if total > monthly_income {
        return Err(ValidationError::OverBudget {
            total,
            income: monthly_income,
        });
    }
    Ok(())
}

/// Flags an error iff the investment total exceeds the disposable income
/// (monthly income minus total expenses). Same live-evaluation contract as
/// `validate_expenses`.
pub fn validate_investments(
    investments: &[Investment],
    available_for_invest: f64,
) -> Result<(), ValidationError> {
    let total: f64 = investments.iter().map(|i| i.amount).sum();
    if total > available_for_invest {
        return Err(ValidationError::OverInvest {
            total,
            available: available_for_invest,
        });
    }
    Ok(())
}

/// Live-total parsing: amount fields hold free text while editing, and
/// empty/non-numeric input counts as zero.
pub fn lenient_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Submit-time parsing for required fields: empty input and non-numeric input
/// are distinct errors so the step can point at the right problem.
pub fn parse_required(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::InvestmentKind;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn expenses(amounts: &[(&str, f64)]) -> Vec<Expense> {
        amounts
            .iter()
            .map(|(category, amount)| Expense {
                category: category.to_string(),
                amount: *amount,
            })
            .collect()
    }

    #[test]
    fn flags_expenses_over_income() {
        let rows = expenses(&[("food", 30_000.0), ("rent", 25_000.0)]);
        let err = validate_expenses(&rows, 50_000.0).expect_err("55000 > 50000 must flag");
        assert_eq!(
            err,
            ValidationError::OverBudget {
                total: 55_000.0,
                income: 50_000.0,
            }
        );
    }

    #[test]
    fn accepts_expenses_at_exactly_income() {
        let rows = expenses(&[("food", 30_000.0), ("rent", 20_000.0)]);
        assert!(validate_expenses(&rows, 50_000.0).is_ok());
    }

    #[test]
    fn flags_investments_over_available() {
        // income 50000, expenses 20000 -> available 30000
        let rows = vec![Investment {
            kind: InvestmentKind::Stocks,
            amount: 31_000.0,
        }];
        let err = validate_investments(&rows, 30_000.0).expect_err("31000 > 30000 must flag");
        assert_eq!(
            err,
            ValidationError::OverInvest {
                total: 31_000.0,
                available: 30_000.0,
            }
        );
    }

    #[test]
    fn lenient_amount_treats_non_numeric_as_zero() {
        assert_eq!(lenient_amount(""), 0.0);
        assert_eq!(lenient_amount("   "), 0.0);
        assert_eq!(lenient_amount("abc"), 0.0);
        assert_eq!(lenient_amount("1200.5"), 1200.5);
    }

    #[test]
    fn parse_required_distinguishes_empty_from_garbage() {
        assert_eq!(
            parse_required("monthly income", ""),
            Err(ValidationError::MissingField {
                field: "monthly income"
            })
        );
        assert_eq!(
            parse_required("monthly income", "5k"),
            Err(ValidationError::InvalidNumber {
                field: "monthly income"
            })
        );
        assert_eq!(parse_required("monthly income", " 50000 "), Ok(50_000.0));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]
        #[test]
        fn expenses_flag_iff_sum_exceeds_income(
            amounts in proptest::collection::vec(0.0f64..100_000.0, 0..8),
            income in 0.0f64..500_000.0,
        ) {
            let rows: Vec<Expense> = amounts
                .iter()
                .map(|amount| Expense { category: "x".to_string(), amount: *amount })
                .collect();
            let total: f64 = amounts.iter().sum();
            let result = validate_expenses(&rows, income);
            prop_assert_eq!(result.is_err(), total > income);
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]
        #[test]
        fn investments_flag_iff_sum_exceeds_available(
            amounts in proptest::collection::vec(0.0f64..100_000.0, 0..8),
            available in 0.0f64..500_000.0,
        ) {
            let rows: Vec<Investment> = amounts
                .iter()
                .map(|amount| Investment { kind: InvestmentKind::Fund, amount: *amount })
                .collect();
            let total: f64 = amounts.iter().sum();
            let result = validate_investments(&rows, available);
            prop_assert!(result.is_err() == (total > available));
        }
    }
}
