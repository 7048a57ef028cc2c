use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The only failure the mapper produces: a field the views strictly require
/// is present but has the wrong shape. Absent or null fields never fail;
/// they default.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MapperError {
    #[error("malformed simulation response: {field} must be {expected}")]
    MalformedResponse {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("up") => Trend::Up,
            Some("down") => Trend::Down,
            _ => Trend::Flat,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCardView {
    pub title: String,
    pub value: String,
    pub icon_bg_color: String,
    pub sub_text: String,
    pub diff: f64,
    pub trend: Trend,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesView {
    pub name: String,
    pub median: Vec<f64>,
    pub confidence_upper: Vec<f64>,
    pub confidence_lower: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartView {
    pub categories: Vec<String>,
    pub baseline: SeriesView,
    pub selected: SeriesView,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSliceView {
    pub category: String,
    pub amount: f64,
    pub color: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    /// No usable data yet; views render their "waiting for data" state.
    Waiting,
    Ready,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: ViewStatus,
    pub stat_cards: Vec<StatCardView>,
    pub line_chart: LineChartView,
    pub pie_chart: Vec<PieSliceView>,
}

impl DashboardView {
    /// The sentinel shown before data arrives and after a malformed response.
    pub fn waiting() -> Self {
        Self {
            status: ViewStatus::Waiting,
            stat_cards: Vec::new(),
            line_chart: LineChartView::default(),
            pie_chart: Vec::new(),
        }
    }
}

fn str_or_empty(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn f64_or_zero(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn numbers_or_empty(value: &Value, key: &str) -> Vec<f64> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_f64().unwrap_or(0.0))
            .collect(),
        _ => Vec::new(),
    }
}

/// Fields the views strictly require must, when present, be sequences.
/// Absent or null is fine and defaults to empty.
fn required_array<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<&'a [Value], MapperError> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(MapperError::MalformedResponse {
            field,
            expected: "a sequence",
        }),
    }
}

fn map_stat_cards(response: &Value) -> Result<Vec<StatCardView>, MapperError> {
    let items = required_array(response.get("statCards"), "statCards")?;
    Ok(items
        .iter()
        .map(|item| StatCardView {
            title: str_or_empty(item, "title"),
            value: str_or_empty(item, "value"),
            icon_bg_color: str_or_empty(item, "iconBgColor"),
            sub_text: str_or_empty(item, "subText"),
            diff: f64_or_zero(item, "diff"),
            trend: Trend::parse(item.get("trend").and_then(Value::as_str)),
        })
        .collect())
}

fn map_categories(line_chart: &Value) -> Result<Vec<String>, MapperError> {
    let items = required_array(line_chart.get("categories"), "lineChart.categories")?;
    let mut categories = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(label) => categories.push(label.clone()),
            Value::Number(month) => categories.push(month.to_string()),
            _ => {
                return Err(MapperError::MalformedResponse {
                    field: "lineChart.categories",
                    expected: "a sequence of month labels",
                });
            }
        }
    }
    Ok(categories)
}

fn map_series(line_chart: &Value) -> Result<Vec<SeriesView>, MapperError> {
    let items = required_array(line_chart.get("scenarios"), "lineChart.scenarios")?;
    Ok(items
        .iter()
        .map(|item| SeriesView {
            name: str_or_empty(item, "name"),
            median: numbers_or_empty(item, "median"),
            confidence_upper: numbers_or_empty(item, "confidenceUpper"),
            confidence_lower: numbers_or_empty(item, "confidenceLower"),
        })
        .collect())
}

fn map_pie_chart(response: &Value) -> Result<Vec<PieSliceView>, MapperError> {
    let expenses = response.get("pieChart").and_then(|pie| pie.get("expenses"));
    let items = required_array(expenses, "pieChart.expenses")?;
    Ok(items
        .iter()
        .map(|item| PieSliceView {
            category: str_or_empty(item, "category"),
            amount: f64_or_zero(item, "amount"),
            color: str_or_empty(item, "color"),
        })
        .collect())
}

/// Reshapes an externally produced, structurally untrusted simulation result
/// into view-ready data. Pure reshaping and defaulting, no computation.
///
/// The baseline view is always `scenarios[0]` of the response; the selected
/// view matches by name and intentionally falls back to the baseline when no
/// scenario matches, so a renamed scenario never breaks the dashboard.
pub fn map_response(
    response: &Value,
    selected_scenario: Option<&str>,
) -> Result<DashboardView, MapperError> {
    let stat_cards = map_stat_cards(response)?;

    let line_chart_value = response.get("lineChart").cloned().unwrap_or(Value::Null);
    if !matches!(line_chart_value, Value::Object(_) | Value::Null) {
        return Err(MapperError::MalformedResponse {
            field: "lineChart",
            expected: "an object",
        });
    }
    let categories = map_categories(&line_chart_value)?;
    let series = map_series(&line_chart_value)?;

    let baseline = series.first().cloned().unwrap_or_default();
    let selected = selected_scenario
        .and_then(|name| series.iter().find(|s| s.name == name).cloned())
        .unwrap_or_else(|| baseline.clone());

    let pie_chart = map_pie_chart(response)?;

    let status = if stat_cards.is_empty() && categories.is_empty() && pie_chart.is_empty() {
        ViewStatus::Waiting
    } else {
        ViewStatus::Ready
    };

    Ok(DashboardView {
        status,
        stat_cards,
        line_chart: LineChartView {
            categories,
            baseline,
            selected,
        },
        pie_chart,
    })
}
