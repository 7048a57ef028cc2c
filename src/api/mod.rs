use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::client::{ClientError, PlannerBackend};
use crate::core::{
    BasicDraft, ExpenseRow, FinancialProfile, InvestmentRow, OnboardingStore, RiskDraft, Scenario,
    ValidationError, build_simulation_request,
};
use crate::dashboard::load_dashboard_view;

#[derive(Clone)]
struct AppState {
    backend: Arc<dyn PlannerBackend>,
}

/// The onboarding submission as the form sends it: every numeric field is a
/// string, exactly as typed, and the parse boundary lives here.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OnboardingPayload {
    total_asset: String,
    monthly_income: String,
    expenses: Vec<ExpensePayload>,
    investments: Vec<InvestmentPayload>,
    fixed_return: String,
    risk_high: bool,
    risk_low: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExpensePayload {
    category: String,
    amount: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InvestmentPayload {
    #[serde(rename = "type")]
    kind: String,
    amount: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DashboardQuery {
    scenario: Option<String>,
}

/// The POST variant of the dashboard request: the client sends its committed
/// scenario list so the simulation runs with the overlays applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DashboardPayload {
    scenario: Option<String>,
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct PreviewPayload {
    profile: FinancialProfile,
    #[serde(default)]
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Runs the whole onboarding sequence against one payload. Step order
/// matters: expenses validate against the committed income, investments
/// against the committed disposable income.
fn profile_from_payload(payload: OnboardingPayload) -> Result<FinancialProfile, ValidationError> {
    let mut store = OnboardingStore::new();
    store.commit_basic(&BasicDraft {
        total_asset: payload.total_asset,
        monthly_income: payload.monthly_income,
    })?;

    let expense_rows: Vec<ExpenseRow> = payload
        .expenses
        .into_iter()
        .map(|row| ExpenseRow {
            category: row.category,
            amount: row.amount,
        })
        .collect();
    store.commit_expenses(&expense_rows)?;

    let investment_rows: Vec<InvestmentRow> = payload
        .investments
        .into_iter()
        .map(|row| InvestmentRow {
            kind: row.kind,
            amount: row.amount,
        })
        .collect();
    let mut risk = RiskDraft::default();
    risk.set_fixed_return(&payload.fixed_return);
    if payload.risk_high {
        risk.toggle_high();
    }
    if payload.risk_low {
        risk.toggle_low();
    }
    store.commit_investments(&investment_rows, &risk)?;

    store.finish()
}

pub async fn run_http_server(port: u16, backend: Arc<dyn PlannerBackend>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/onboarding/:user_id", post(onboarding_handler))
        .route(
            "/api/dashboard/:user_id",
            get(dashboard_get_handler).post(dashboard_post_handler),
        )
        .route("/api/simulate-preview", post(simulate_preview_handler))
        .fallback(not_found_handler)
        .with_state(AppState { backend });

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "planner gateway listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn onboarding_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<OnboardingPayload>,
) -> Response {
    let profile = match profile_from_payload(payload) {
        Ok(profile) => profile,
        Err(err) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string()),
    };
    if let Err(err) = state.backend.save_profile(user_id, &profile).await {
        return client_error_response(&err);
    }
    json_response(StatusCode::OK, profile)
}

async fn dashboard_get_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    dashboard_handler_impl(state, user_id, &[], query.scenario.as_deref()).await
}

async fn dashboard_post_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<DashboardPayload>,
) -> Response {
    dashboard_handler_impl(
        state,
        user_id,
        &payload.scenarios,
        payload.scenario.as_deref(),
    )
    .await
}

async fn dashboard_handler_impl(
    state: AppState,
    user_id: u64,
    scenarios: &[Scenario],
    selected_scenario: Option<&str>,
) -> Response {
    match load_dashboard_view(state.backend.as_ref(), user_id, scenarios, selected_scenario).await {
        Ok(view) => json_response(StatusCode::OK, view),
        Err(err) => client_error_response(&err),
    }
}

/// Returns the request that would be sent for this profile and scenario set,
/// without calling the simulation service.
async fn simulate_preview_handler(Json(payload): Json<PreviewPayload>) -> Response {
    let request = build_simulation_request(&payload.profile, &payload.scenarios);
    json_response(StatusCode::OK, request)
}

fn client_error_response(err: &ClientError) -> Response {
    error_response(StatusCode::BAD_GATEWAY, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn profile_from_json(json: &str) -> Result<FinancialProfile, String> {
    let payload = serde_json::from_str::<OnboardingPayload>(json)
        .map_err(|e| format!("Invalid onboarding JSON payload: {e}"))?;
    profile_from_payload(payload).map_err(|e| e.to_string())
}
