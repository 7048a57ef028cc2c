use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::validate::ValidationError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Expense,
    IncomeDelta,
    InvestRatioDelta,
    MarketOverride,
}

/// A timed adjustment inside a scenario. `end_month_idx: None` means a
/// one-off (or, for delta kinds, a permanent change from `month_idx` on).
/// `amount` is meaningful for expense/market_override, `delta` for
/// income_delta/invest_ratio_delta; the other field is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub month_idx: u32,
    pub end_month_idx: Option<u32>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub label: String,
    pub amount: Option<f64>,
    pub delta: Option<f64>,
}

/// A named overlay on top of a financial profile: proportional expense
/// adjustments for the whole horizon, an additive investment-ratio delta
/// (clamped to [0, 1] by the simulation service), and timed events.
/// Scenarios never mutate the profile; they only parameterize a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expenses_delta: BTreeMap<String, f64>,
    #[serde(default)]
    pub invest_ratio_delta: f64,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Scenario {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            expenses_delta: BTreeMap::new(),
            invest_ratio_delta: 0.0,
            events: Vec::new(),
        }
    }
}

/// Draft/commit editing of one scenario. Opening deep-copies the target so
/// in-progress edits never leak into the committed list; save yields the
/// draft for commit, cancel is simply dropping the editor.
#[derive(Clone, Debug)]
pub struct ScenarioEditor {
    draft: Scenario,
}

impl ScenarioEditor {
    pub fn open(scenario: &Scenario) -> Self {
        Self {
            draft: scenario.clone(),
        }
    }

    pub fn draft(&self) -> &Scenario {
        &self.draft
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.description = description.to_string();
    }

    pub fn set_invest_ratio_delta(&mut self, delta: f64) {
        self.draft.invest_ratio_delta = delta;
    }

    pub fn set_expense_delta(&mut self, category: &str, delta: f64) {
        self.draft
            .expenses_delta
            .insert(category.to_string(), delta);
    }

    pub fn remove_expense_delta(&mut self, category: &str) -> Option<f64> {
        self.draft.expenses_delta.remove(category)
    }

    /// Renaming a delta key (placeholder -> real category) is delete old key,
    /// insert new key with the old value; ordering among the remaining keys
    /// follows the map, not insertion history.
    pub fn rename_expense_delta(&mut self, old: &str, new: &str) -> bool {
        match self.draft.expenses_delta.remove(old) {
            Some(value) => {
                self.draft.expenses_delta.insert(new.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn add_event(&mut self, event: Event) -> Result<(), ValidationError> {
        if event.month_idx < 1 {
            return Err(ValidationError::InvalidEventMonth);
        }
        self.draft.events.push(event);
        Ok(())
    }

    pub fn remove_event(&mut self, index: usize) -> Option<Event> {
        if index < self.draft.events.len() {
            Some(self.draft.events.remove(index))
        } else {
            None
        }
    }

    pub fn save(self) -> Scenario {
        self.draft
    }
}

/// The committed scenario list shown on the dashboard.
#[derive(Clone, Debug, Default)]
pub struct ScenarioList {
    scenarios: Vec<Scenario>,
}

impl ScenarioList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: u64) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Replaces the entry with the same id, or appends when the id is new.
    pub fn commit(&mut self, scenario: Scenario) {
        match self.scenarios.iter_mut().find(|s| s.id == scenario.id) {
            Some(slot) => *slot = scenario,
            None => self.scenarios.push(scenario),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_event() -> Event {
        Event {
            month_idx: 6,
            end_month_idx: None,
            kind: EventKind::Expense,
            label: "trip".to_string(),
            amount: Some(30_000.0),
            delta: None,
        }
    }

    #[test]
    fn editing_the_draft_leaves_the_original_untouched() {
        let original = Scenario::new(1, "Baseline");
        let mut editor = ScenarioEditor::open(&original);
        editor.set_name("Frugal year");
        editor.set_expense_delta("food", -0.1);
        editor.add_event(trip_event()).expect("month 6 is valid");

        assert_eq!(original.name, "Baseline");
        assert!(original.expenses_delta.is_empty());
        assert!(original.events.is_empty());
        assert_eq!(editor.draft().name, "Frugal year");
    }

    #[test]
    fn save_replaces_the_committed_entry_by_id() {
        let mut list = ScenarioList::new();
        list.commit(Scenario::new(1, "Baseline"));
        list.commit(Scenario::new(2, "Aggressive"));

        let mut editor = ScenarioEditor::open(list.get(1).expect("id 1 exists"));
        editor.set_name("Frugal year");
        list.commit(editor.save());

        assert_eq!(list.as_slice().len(), 2);
        assert_eq!(list.get(1).expect("id 1 exists").name, "Frugal year");
        assert_eq!(list.get(2).expect("id 2 exists").name, "Aggressive");
    }

    #[test]
    fn cancel_discards_the_draft_unconditionally() {
        let mut list = ScenarioList::new();
        list.commit(Scenario::new(1, "Baseline"));

        let mut editor = ScenarioEditor::open(list.get(1).expect("id 1 exists"));
        editor.set_name("abandoned edit");
        drop(editor);

        assert_eq!(list.get(1).expect("id 1 exists").name, "Baseline");
    }

    #[test]
    fn renaming_a_delta_key_keeps_the_old_value() {
        let mut editor = ScenarioEditor::open(&Scenario::new(1, "Baseline"));
        editor.set_expense_delta("category_1", -0.07);
        assert!(editor.rename_expense_delta("category_1", "food"));

        assert_eq!(editor.draft().expenses_delta.get("food"), Some(&-0.07));
        assert_eq!(editor.draft().expenses_delta.get("category_1"), None);
        assert!(!editor.rename_expense_delta("missing", "rent"));
    }

    #[test]
    fn events_before_month_one_are_rejected() {
        let mut editor = ScenarioEditor::open(&Scenario::new(1, "Baseline"));
        let mut event = trip_event();
        event.month_idx = 0;
        assert_eq!(
            editor.add_event(event),
            Err(ValidationError::InvalidEventMonth)
        );
    }

    #[test]
    fn remove_event_out_of_range_is_a_noop() {
        let mut editor = ScenarioEditor::open(&Scenario::new(1, "Baseline"));
        editor.add_event(trip_event()).expect("month 6 is valid");
        assert!(editor.remove_event(5).is_none());
        assert_eq!(editor.remove_event(0), Some(trip_event()));
        assert!(editor.draft().events.is_empty());
    }
}
