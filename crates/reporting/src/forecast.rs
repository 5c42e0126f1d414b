//! Scenario forecasting. Projects a flat daily spend/revenue series from the
//! trailing baseline, scaled by the operator's budget and ROAS adjustments.
//!
//! Every projected day carries the same spend and ROAS. There is no trend
//! fitting and no compounding between days.

use crate::baseline::{estimate_baseline, Baseline};
use crate::daily::DailyAggregate;
use crate::metrics::safe_div;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What-if adjustments applied on top of the baseline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    /// Days to project past the last historical day.
    pub horizon_days: u32,
    /// Signed percentage applied to baseline daily spend.
    pub budget_growth_pct: f64,
    /// Signed percentage applied to baseline ROAS.
    pub roas_change_pct: f64,
}

impl ScenarioParams {
    pub fn flat(horizon_days: u32) -> Self {
        Self {
            horizon_days,
            budget_growth_pct: 0.0,
            roas_change_pct: 0.0,
        }
    }

    pub fn projected_spend(&self, baseline: &Baseline) -> f64 {
        baseline.average_daily_spend * (1.0 + self.budget_growth_pct / 100.0)
    }

    pub fn projected_roas(&self, baseline: &Baseline) -> f64 {
        baseline.average_roas * (1.0 + self.roas_change_pct / 100.0)
    }
}

/// A day in a chart series. Historical days have `is_forecast == false`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
    pub is_forecast: bool,
}

impl From<&DailyAggregate> for ForecastPoint {
    fn from(day: &DailyAggregate) -> Self {
        Self {
            date: day.date,
            spend: day.spend,
            revenue: day.revenue,
            roas: day.roas,
            is_forecast: false,
        }
    }
}

/// Project `params.horizon_days` days after `last_date`.
///
/// Returns an empty series when the baseline was built from no history.
pub fn project(baseline: &Baseline, last_date: NaiveDate, params: &ScenarioParams) -> Vec<ForecastPoint> {
    if baseline.is_empty() {
        return Vec::new();
    }

    let spend = params.projected_spend(baseline);
    let roas = params.projected_roas(baseline);
    let revenue = spend * roas;

    (1..=u64::from(params.horizon_days))
        .map_while(|offset| last_date.checked_add_days(Days::new(offset)))
        .map(|date| ForecastPoint {
            date,
            spend,
            revenue,
            roas,
            is_forecast: true,
        })
        .collect()
}

/// Totals across the projected days.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub horizon_days: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    /// Blended: total revenue over total spend.
    pub roas: f64,
}

impl ForecastSummary {
    pub fn from_points(points: &[ForecastPoint]) -> Self {
        let total_spend: f64 = points.iter().map(|p| p.spend).sum();
        let total_revenue: f64 = points.iter().map(|p| p.revenue).sum();
        Self {
            horizon_days: points.len(),
            total_spend,
            total_revenue,
            roas: safe_div(total_revenue, total_spend),
        }
    }
}

/// Baseline, projected series and totals for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub params: ScenarioParams,
    pub baseline: Baseline,
    pub points: Vec<ForecastPoint>,
    pub summary: ForecastSummary,
}

impl Forecast {
    /// Run a scenario over an ascending daily history.
    pub fn run(history: &[DailyAggregate], window: usize, params: ScenarioParams) -> Self {
        let baseline = estimate_baseline(history, window);
        let points = match history.last() {
            Some(last) => project(&baseline, last.date, &params),
            None => Vec::new(),
        };
        let summary = ForecastSummary::from_points(&points);

        debug!(
            history_days = history.len(),
            baseline_days = baseline.days_used,
            horizon = points.len(),
            "Forecast computed"
        );

        Self {
            params,
            baseline,
            points,
            summary,
        }
    }
}

/// The last `history_days` historical days followed by the forecast, ready
/// for a combined chart.
pub fn chart_series(
    history: &[DailyAggregate],
    forecast: &[ForecastPoint],
    history_days: usize,
) -> Vec<ForecastPoint> {
    let recent = &history[history.len().saturating_sub(history_days)..];
    recent
        .iter()
        .map(ForecastPoint::from)
        .chain(forecast.iter().copied())
        .collect()
}
