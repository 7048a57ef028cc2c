use tracing::warn;

use crate::client::{ClientError, PlannerBackend};
use crate::core::{
    DashboardView, Scenario, ScenarioList, build_simulation_request, map_response,
};
use crate::session::{Session, SessionStore};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// One full dashboard load, strictly sequential: fetch the profile, build the
/// request from it, simulate, map. A user with no saved profile gets the
/// waiting view, not an error. A malformed simulation body also degrades to
/// the waiting view, because the backend answered and retrying would not
/// change the shape.
pub async fn load_dashboard_view(
    backend: &dyn PlannerBackend,
    user_id: u64,
    scenarios: &[Scenario],
    selected_scenario: Option<&str>,
) -> Result<DashboardView, ClientError> {
    let Some(profile) = backend.fetch_profile(user_id).await? else {
        return Ok(DashboardView::waiting());
    };
    let request = build_simulation_request(&profile, scenarios);
    let response = backend.simulate(&request).await?;
    match map_response(&response, selected_scenario) {
        Ok(view) => Ok(view),
        Err(err) => {
            warn!(user_id, error = %err, "simulation response did not map, showing waiting view");
            Ok(DashboardView::waiting())
        }
    }
}

/// Owns the dashboard's client-side state: the session, the committed
/// scenario list, the current selection, and the last successfully loaded
/// view.
pub struct DashboardController {
    session: SessionStore,
    scenarios: ScenarioList,
    selected: Option<String>,
    view: DashboardView,
    phase: Phase,
    last_error: Option<String>,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardController {
    pub fn new() -> Self {
        Self {
            session: SessionStore::new(),
            scenarios: ScenarioList::new(),
            selected: None,
            view: DashboardView::waiting(),
            phase: Phase::Idle,
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn scenarios(&self) -> &ScenarioList {
        &self.scenarios
    }

    pub fn set_session(&mut self, session: Session) {
        self.session.set(session);
    }

    pub fn log_out(&mut self) {
        self.session.clear();
        self.view = DashboardView::waiting();
        self.phase = Phase::Idle;
        self.last_error = None;
    }

    pub fn select_scenario(&mut self, name: Option<&str>) {
        self.selected = name.map(str::to_string);
    }

    /// Reloads the view for the current session. Without a session this is a
    /// no-op that leaves the controller idle. A transport or backend failure
    /// keeps the previous view on screen and records the error.
    pub async fn refresh(&mut self, backend: &dyn PlannerBackend) {
        let Some(user_id) = self.session.current().map(|s| s.user_id) else {
            self.phase = Phase::Idle;
            return;
        };
        self.phase = Phase::Loading;
        match load_dashboard_view(
            backend,
            user_id,
            self.scenarios.as_slice(),
            self.selected.as_deref(),
        )
        .await
        {
            Ok(view) => {
                self.view = view;
                self.phase = Phase::Ready;
                self.last_error = None;
            }
            Err(err) => {
                self.phase = Phase::Failed;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Commits an edited scenario and reloads exactly once.
    pub async fn save_scenario(&mut self, backend: &dyn PlannerBackend, scenario: Scenario) {
        self.scenarios.commit(scenario);
        self.refresh(backend).await;
    }
}
