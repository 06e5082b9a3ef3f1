//! Dashboard charts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server embeds each chart's series as JSON in `data-*` attributes on a
//! `<canvas>`. This module parses those attributes into typed series, builds
//! the Chart.js configuration as `serde_json::Value`, and hands it to the
//! page's global `Chart` constructor.
//!
//! ERROR HANDLING
//! ==============
//! Each chart is independent: a canvas with missing or malformed data is
//! logged and skipped, the others still render.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub const CATEGORY_CANVAS_ID: &str = "chartTorta";
pub const DAILY_CANVAS_ID: &str = "chartDiario";
pub const MONTHLY_CANVAS_ID: &str = "chartBarras";

pub const LABELS_ATTRIBUTE: &str = "data-labels";
pub const CATEGORY_AMOUNTS_ATTRIBUTE: &str = "data-data";
pub const DAILY_AMOUNTS_ATTRIBUTE: &str = "data-values";
pub const INCOME_ATTRIBUTE: &str = "data-ingresos";
pub const EXPENSES_ATTRIBUTE: &str = "data-gastos";

/// Slice colors for the category doughnut, reused cyclically by Chart.js.
pub const CATEGORY_PALETTE: [&str; 7] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#C9CBCF",
];

const DAILY_LINE_COLOR: &str = "#36A2EB";
const DAILY_FILL_COLOR: &str = "rgba(54, 162, 235, 0.1)";
const INCOME_COLOR: &str = "#198754";
const EXPENSE_COLOR: &str = "#dc3545";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartDataError {
    #[error("missing attribute {0}")]
    Missing(&'static str),
    #[error("invalid data in {attribute}: {reason}")]
    Invalid { attribute: &'static str, reason: String },
    #[error("{attribute} has {values} values for {labels} labels")]
    LengthMismatch {
        attribute: &'static str,
        labels: usize,
        values: usize,
    },
}

// =============================================================================
// ATTRIBUTE PARSING
// =============================================================================

/// Amounts arrive as JSON numbers, or as strings when the template renders
/// decimals verbatim.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

fn parse_json<T: DeserializeOwned>(attribute: &'static str, raw: Option<&str>) -> Result<T, ChartDataError> {
    let raw = raw.ok_or(ChartDataError::Missing(attribute))?;
    serde_json::from_str(raw).map_err(|e| ChartDataError::Invalid {
        attribute,
        reason: e.to_string(),
    })
}

fn parse_labels(raw: Option<&str>) -> Result<Vec<String>, ChartDataError> {
    parse_json(LABELS_ATTRIBUTE, raw)
}

fn parse_amounts(attribute: &'static str, raw: Option<&str>, labels: usize) -> Result<Vec<f64>, ChartDataError> {
    let amounts: Vec<Amount> = parse_json(attribute, raw)?;
    if amounts.len() != labels {
        return Err(ChartDataError::LengthMismatch {
            attribute,
            labels,
            values: amounts.len(),
        });
    }
    amounts
        .into_iter()
        .map(|amount| match amount {
            Amount::Number(n) => Ok(n),
            Amount::Text(s) => s.trim().parse::<f64>().map_err(|e| ChartDataError::Invalid {
                attribute,
                reason: format!("{s:?}: {e}"),
            }),
        })
        .collect()
}

// =============================================================================
// CHARTS
// =============================================================================

/// Spending per category (doughnut).
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBreakdown {
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
}

impl CategoryBreakdown {
    /// # Errors
    ///
    /// Returns `ChartDataError` for missing, malformed, or mismatched series.
    pub fn from_attributes(labels: Option<&str>, amounts: Option<&str>) -> Result<Self, ChartDataError> {
        let labels = parse_labels(labels)?;
        let amounts = parse_amounts(CATEGORY_AMOUNTS_ATTRIBUTE, amounts, labels.len())?;
        Ok(Self { labels, amounts })
    }

    pub fn chart_config(&self) -> Value {
        json!({
            "type": "doughnut",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "data": self.amounts,
                    "backgroundColor": CATEGORY_PALETTE,
                    "borderWidth": 1,
                }],
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "legend": { "position": "bottom" },
                    "title": { "display": false },
                },
            },
        })
    }
}

/// Spending per day of the current period (filled line).
#[derive(Clone, Debug, PartialEq)]
pub struct DailySpending {
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
}

impl DailySpending {
    /// # Errors
    ///
    /// Returns `ChartDataError` for missing, malformed, or mismatched series.
    pub fn from_attributes(labels: Option<&str>, amounts: Option<&str>) -> Result<Self, ChartDataError> {
        let labels = parse_labels(labels)?;
        let amounts = parse_amounts(DAILY_AMOUNTS_ATTRIBUTE, amounts, labels.len())?;
        Ok(Self { labels, amounts })
    }

    pub fn chart_config(&self) -> Value {
        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "label": "Gasto Diario ($)",
                    "data": self.amounts,
                    "borderColor": DAILY_LINE_COLOR,
                    "backgroundColor": DAILY_FILL_COLOR,
                    "borderWidth": 2,
                    "pointRadius": 3,
                    "fill": true,
                    "tension": 0.3,
                }],
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": {
                    "y": { "beginAtZero": true },
                    "x": { "grid": { "display": false } },
                },
                "plugins": {
                    "legend": { "display": false },
                },
            },
        })
    }
}

/// Income against expenses per month (grouped bars).
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyComparison {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expenses: Vec<f64>,
}

impl MonthlyComparison {
    /// # Errors
    ///
    /// Returns `ChartDataError` for missing, malformed, or mismatched series.
    pub fn from_attributes(
        labels: Option<&str>,
        income: Option<&str>,
        expenses: Option<&str>,
    ) -> Result<Self, ChartDataError> {
        let labels = parse_labels(labels)?;
        let income = parse_amounts(INCOME_ATTRIBUTE, income, labels.len())?;
        let expenses = parse_amounts(EXPENSES_ATTRIBUTE, expenses, labels.len())?;
        Ok(Self {
            labels,
            income,
            expenses,
        })
    }

    pub fn chart_config(&self) -> Value {
        json!({
            "type": "bar",
            "data": {
                "labels": self.labels,
                "datasets": [
                    {
                        "label": "Ingresos",
                        "data": self.income,
                        "backgroundColor": INCOME_COLOR,
                        "borderRadius": 4,
                    },
                    {
                        "label": "Gastos",
                        "data": self.expenses,
                        "backgroundColor": EXPENSE_COLOR,
                        "borderRadius": 4,
                    },
                ],
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": {
                    "y": { "beginAtZero": true },
                },
                "plugins": {
                    "legend": { "position": "bottom" },
                },
            },
        })
    }
}

// =============================================================================
// BROWSER BINDING
// =============================================================================

/// Render every dashboard chart present on the page.
pub fn attach() {
    #[cfg(feature = "hydrate")]
    {
        render(CATEGORY_CANVAS_ID, |canvas| {
            CategoryBreakdown::from_attributes(
                canvas.get_attribute(LABELS_ATTRIBUTE).as_deref(),
                canvas.get_attribute(CATEGORY_AMOUNTS_ATTRIBUTE).as_deref(),
            )
            .map(|chart| chart.chart_config())
        });
        render(DAILY_CANVAS_ID, |canvas| {
            DailySpending::from_attributes(
                canvas.get_attribute(LABELS_ATTRIBUTE).as_deref(),
                canvas.get_attribute(DAILY_AMOUNTS_ATTRIBUTE).as_deref(),
            )
            .map(|chart| chart.chart_config())
        });
        render(MONTHLY_CANVAS_ID, |canvas| {
            MonthlyComparison::from_attributes(
                canvas.get_attribute(LABELS_ATTRIBUTE).as_deref(),
                canvas.get_attribute(INCOME_ATTRIBUTE).as_deref(),
                canvas.get_attribute(EXPENSES_ATTRIBUTE).as_deref(),
            )
            .map(|chart| chart.chart_config())
        });
    }
}

#[cfg(feature = "hydrate")]
fn render(
    canvas_id: &str,
    build: impl FnOnce(&web_sys::HtmlCanvasElement) -> Result<Value, ChartDataError>,
) {
    use crate::dom;

    let Some(canvas) = dom::element_by_id::<web_sys::HtmlCanvasElement>(canvas_id) else {
        return;
    };
    let config = match build(&canvas) {
        Ok(config) => config,
        Err(err) => {
            log::error!("chart #{canvas_id} skipped: {err}");
            return;
        }
    };
    let context = match canvas.get_context("2d") {
        Ok(Some(context)) => context,
        Ok(None) => {
            log::error!("chart #{canvas_id} has no 2d context");
            return;
        }
        Err(err) => {
            log::error!("chart #{canvas_id} context failed: {err:?}");
            return;
        }
    };
    let created = dom::js::json_to_js(&config)
        .and_then(|config| dom::js::construct(&["Chart"], &js_sys::Array::of2(&context, &config)));
    if let Err(err) = created {
        log::error!("chart #{canvas_id} failed to render: {err:?}");
    }
}
