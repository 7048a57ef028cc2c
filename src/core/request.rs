use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::profile::{Expense, FinancialProfile, RiskMode};
use super::scenario::{Event, Scenario};

/// Used when the profile carries no investments (or no disposable income) to
/// derive a ratio from.
pub const DEFAULT_INVEST_RATIO: f64 = 0.2;
/// Monte-Carlo path count sent with every request.
pub const SIMULATION_PATHS: u32 = 1000;
/// Fixed seed so repeated requests are reproducible end to end.
pub const SIMULATION_SEED: u64 = 12345;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMode {
    Fixed,
    Normal,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Custom,
    LowRisk,
    HighRisk,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketModel {
    pub mode: MarketMode,
    pub profile: RiskProfile,
    pub fixed_annual_return: f64,
}

/// A scenario as the simulation service expects it: the client-side id is
/// local-only and stripped here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPayload {
    pub name: String,
    pub description: String,
    pub expenses_delta: BTreeMap<String, f64>,
    pub invest_ratio_delta: f64,
    pub events: Vec<Event>,
}

impl From<&Scenario> for ScenarioPayload {
    fn from(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            expenses_delta: scenario.expenses_delta.clone(),
            invest_ratio_delta: scenario.invest_ratio_delta,
            events: scenario.events.clone(),
        }
    }
}

/// The exact contract of POST /simulate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub initial_assets: f64,
    pub income_monthly: f64,
    pub expenses: Vec<Expense>,
    pub invest_ratio: f64,
    pub market_model: MarketModel,
    pub scenarios: Vec<ScenarioPayload>,
    pub paths: u32,
    pub seed: u64,
}

/// Base investment ratio: committed investments over disposable income,
/// clamped to [0, 1]. Falls back to `DEFAULT_INVEST_RATIO` when there is
/// nothing to derive from.
pub fn derive_invest_ratio(profile: &FinancialProfile) -> f64 {
    let available = profile.available_for_invest();
    let total = profile.total_investments();
    if total <= 0.0 || available <= 0.0 {
        return DEFAULT_INVEST_RATIO;
    }
    (total / available).clamp(0.0, 1.0)
}

fn market_model_for(profile: &FinancialProfile) -> MarketModel {
    let mode = match profile.fixed_return {
        Some(rate) if rate > 0.0 => MarketMode::Fixed,
        _ => MarketMode::Normal,
    };
    let risk_profile = match profile.risk_mode {
        RiskMode::High => RiskProfile::HighRisk,
        RiskMode::Low => RiskProfile::LowRisk,
        RiskMode::Fixed => RiskProfile::Custom,
    };
    MarketModel {
        mode,
        profile: risk_profile,
        // Entered as a percent, sent as a fraction; 5%/yr is the service's
        // own default when nothing was entered.
        fixed_annual_return: profile.fixed_return.map_or(0.05, |rate| rate / 100.0),
    }
}

/// Deterministic, side-effect-free: identical inputs always produce
/// byte-identical JSON (delta maps are ordered, paths/seed are fixed), so
/// repeated simulation calls can be memoized on the serialized request.
pub fn build_simulation_request(
    profile: &FinancialProfile,
    scenarios: &[Scenario],
) -> SimulationRequest {
    SimulationRequest {
        initial_assets: profile.total_asset,
        income_monthly: profile.monthly_income,
        expenses: profile.expenses.clone(),
        invest_ratio: derive_invest_ratio(profile),
        market_model: market_model_for(profile),
        scenarios: scenarios.iter().map(ScenarioPayload::from).collect(),
        paths: SIMULATION_PATHS,
        seed: SIMULATION_SEED,
    }
}
