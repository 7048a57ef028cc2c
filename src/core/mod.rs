mod mapper;
mod onboarding;
mod profile;
mod request;
mod scenario;
mod validate;

pub use mapper::{
    DashboardView, LineChartView, MapperError, PieSliceView, SeriesView, StatCardView, Trend,
    ViewStatus, map_response,
};
pub use onboarding::{
    BasicDraft, ExpenseRow, InvestmentRow, OnboardingStore, RiskDraft, expense_rows_total,
    investment_rows_total, live_expense_error, live_investment_error,
};
pub use profile::{Expense, FinancialProfile, Investment, InvestmentKind, RiskMode};
pub use request::{
    DEFAULT_INVEST_RATIO, MarketMode, MarketModel, RiskProfile, SIMULATION_PATHS, SIMULATION_SEED,
    ScenarioPayload, SimulationRequest, build_simulation_request, derive_invest_ratio,
};
pub use scenario::{Event, EventKind, Scenario, ScenarioEditor, ScenarioList};
pub use validate::{
    ValidationError, lenient_amount, parse_required, validate_expenses, validate_investments,
};
