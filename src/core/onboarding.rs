use super::profile::{Expense, FinancialProfile, Investment, InvestmentKind, RiskMode};
use super::validate::{
    ValidationError, lenient_amount, parse_required, validate_expenses, validate_investments,
};

/// Step 1 form fields, string-valued while editing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicDraft {
    pub total_asset: String,
    pub monthly_income: String,
}

/// One expense row as typed, before the parse boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseRow {
    pub category: String,
    pub amount: String,
}

/// One investment row as typed; `kind` holds the raw select value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvestmentRow {
    pub kind: String,
    pub amount: String,
}

pub fn expense_rows_total(rows: &[ExpenseRow]) -> f64 {
    rows.iter().map(|r| lenient_amount(&r.amount)).sum()
}

pub fn investment_rows_total(rows: &[InvestmentRow]) -> f64 {
    rows.iter().map(|r| lenient_amount(&r.amount)).sum()
}

/// Live budget check for the expense step: the error is recomputed on every
/// row edit, not just on submit.
pub fn live_expense_error(rows: &[ExpenseRow], monthly_income: f64) -> Option<ValidationError> {
    let total = expense_rows_total(rows);
    (total > monthly_income).then(|| ValidationError::OverBudget {
        total,
        income: monthly_income,
    })
}

pub fn live_investment_error(
    rows: &[InvestmentRow],
    available_for_invest: f64,
) -> Option<ValidationError> {
    let total = investment_rows_total(rows);
    (total > available_for_invest).then(|| ValidationError::OverInvest {
        total,
        available: available_for_invest,
    })
}

/// Risk selection for Step 3. Setting any one of {fixed return non-empty,
/// high, low} clears the other two.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RiskDraft {
    pub fixed_return: String,
    pub high: bool,
    pub low: bool,
}

impl RiskDraft {
    pub fn set_fixed_return(&mut self, value: &str) {
        self.fixed_return = value.to_string();
        if !self.fixed_return.trim().is_empty() {
            self.high = false;
            self.low = false;
        }
    }

    pub fn toggle_high(&mut self) {
        self.high = !self.high;
        if self.high {
            self.low = false;
            self.fixed_return.clear();
        }
    }

    pub fn toggle_low(&mut self) {
        self.low = !self.low;
        if self.low {
            self.high = false;
            self.fixed_return.clear();
        }
    }

    /// Onboarding submit: exactly one selection must be active.
    pub fn resolve(&self) -> Result<(RiskMode, Option<f64>), ValidationError> {
        if self.high {
            return Ok((RiskMode::High, None));
        }
        if self.low {
            return Ok((RiskMode::Low, None));
        }
        if !self.fixed_return.trim().is_empty() {
            let rate = parse_required("fixed return", &self.fixed_return)?;
            return Ok((RiskMode::Fixed, Some(rate)));
        }
        Err(ValidationError::MissingRiskSelection)
    }

    /// Settings-edit flow: no selection falls back to fixed with no rate.
    pub fn resolve_or_default(&self) -> (RiskMode, Option<f64>) {
        self.resolve().unwrap_or((RiskMode::Fixed, None))
    }
}

/// Accumulates the onboarding answers across steps. Each step commits through
/// an explicit action that validates the draft; the profile is assembled only
/// by `finish` and is never partially written.
#[derive(Clone, Debug, Default)]
pub struct OnboardingStore {
    basic: Option<(f64, f64)>,
    expenses: Option<Vec<Expense>>,
    investments: Option<Vec<Investment>>,
    risk: Option<(RiskMode, Option<f64>)>,
}

impl OnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step 1 "Next": total asset and monthly income are required, asset may
    /// be zero, income must be positive.
    pub fn commit_basic(&mut self, draft: &BasicDraft) -> Result<(), ValidationError> {
        let total_asset = parse_required("total asset", &draft.total_asset)?;
        let monthly_income = parse_required("monthly income", &draft.monthly_income)?;
        if total_asset < 0.0 {
            return Err(ValidationError::NegativeAsset);
        }
        if monthly_income <= 0.0 {
            return Err(ValidationError::NonPositiveIncome);
        }
        self.basic = Some((total_asset, monthly_income));
        Ok(())
    }

    /// Step 2 "Next": rows parse leniently (blank amounts count as zero) but
    /// the budget rule is enforced against the committed income.
    pub fn commit_expenses(&mut self, rows: &[ExpenseRow]) -> Result<(), ValidationError> {
        let (_, monthly_income) = self.basic.ok_or(ValidationError::MissingField {
            field: "basic info",
        })?;
        let expenses: Vec<Expense> = rows
            .iter()
            .map(|row| Expense {
                category: row.category.trim().to_string(),
                amount: lenient_amount(&row.amount),
            })
            .collect();
        validate_expenses(&expenses, monthly_income)?;
        self.expenses = Some(expenses);
        Ok(())
    }

    /// Step 3 "Next": investments are capped by disposable income, and a risk
    /// selection is mandatory.
    pub fn commit_investments(
        &mut self,
        rows: &[InvestmentRow],
        risk: &RiskDraft,
    ) -> Result<(), ValidationError> {
        let available = self
            .available_for_invest()
            .ok_or(ValidationError::MissingField { field: "expenses" })?;
        let mut investments = Vec::with_capacity(rows.len());
        for row in rows {
            let kind = InvestmentKind::parse(row.kind.trim())
                .ok_or_else(|| ValidationError::UnknownInvestmentKind(row.kind.clone()))?;
            investments.push(Investment {
                kind,
                amount: lenient_amount(&row.amount),
            });
        }
        validate_investments(&investments, available)?;
        let resolved = risk.resolve()?;
        self.investments = Some(investments);
        self.risk = Some(resolved);
        Ok(())
    }

    pub fn available_for_invest(&self) -> Option<f64> {
        let (_, monthly_income) = self.basic?;
        let expenses = self.expenses.as_ref()?;
        Some(monthly_income - expenses.iter().map(|e| e.amount).sum::<f64>())
    }

    /// Step 4 "Confirm & Finish": assembles the whole profile from the
    /// committed steps.
    pub fn finish(&self) -> Result<FinancialProfile, ValidationError> {
        let (total_asset, monthly_income) = self.basic.ok_or(ValidationError::MissingField {
            field: "basic info",
        })?;
        let expenses = self
            .expenses
            .clone()
            .ok_or(ValidationError::MissingField { field: "expenses" })?;
        let investments = self.investments.clone().ok_or(ValidationError::MissingField {
            field: "investments",
        })?;
        let (risk_mode, fixed_return) = self.risk.ok_or(ValidationError::MissingRiskSelection)?;
        Ok(FinancialProfile {
            total_asset,
            monthly_income,
            expenses,
            investments,
            risk_mode,
            fixed_return,
        })
    }
}
