use serde::{Deserialize, Serialize};

/// Investment vehicles the onboarding flow offers. Serialized lowercase,
/// matching what the persistence backend stores.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentKind {
    Stocks,
    Etf,
    Crypto,
    Fund,
}

impl InvestmentKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "stocks" => Some(InvestmentKind::Stocks),
            "etf" => Some(InvestmentKind::Etf),
            "crypto" => Some(InvestmentKind::Crypto),
            "fund" => Some(InvestmentKind::Fund),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskMode {
    Fixed,
    High,
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub category: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    pub amount: f64,
}

/// The committed financial profile assembled by onboarding and persisted as a
/// whole. Field names on the wire follow the persistence backend
/// (`totalAsset`, `monthlyIncome`, ...).
///
/// `fixed_return` is a percentage as entered (5 means 5%/yr) and is `None`
/// unless `risk_mode` is `Fixed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub total_asset: f64,
    pub monthly_income: f64,
    pub expenses: Vec<Expense>,
    pub investments: Vec<Investment>,
    pub risk_mode: RiskMode,
    pub fixed_return: Option<f64>,
}

impl FinancialProfile {
    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn total_investments(&self) -> f64 {
        self.investments.iter().map(|i| i.amount).sum()
    }

    /// Disposable income: the ceiling for monthly investment allocation.
    pub fn available_for_invest(&self) -> f64 {
        self.monthly_income - self.total_expenses()
    }
}
