//! Report composition. Runs the pipeline end to end for the dashboard and
//! forecast views, and produces the compact summaries handed to the insight
//! service.

use crate::aggregate::aggregate_campaigns;
use crate::classifier::{classify, count_alerts, meets_cpa_target, winner_ranks, AlertCounts, PerformanceTier, Thresholds};
use crate::daily::aggregate_daily;
use crate::forecast::{chart_series, Forecast, ForecastPoint, ScenarioParams};
use crate::metrics::CampaignMetrics;
use crate::range::{filter_by_range, DateRange};
use crate::totals::{funnel, platform_breakdown, FunnelStage, PlatformBreakdown, Totals};
use adpulse_core::{Platform, RawRecord, Settings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A campaign row as shown in the detailed table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    #[serde(flatten)]
    pub campaign: CampaignMetrics,
    pub tier: PerformanceTier,
    pub meets_cpa_target: bool,
    /// 1, 2 or 3 for the top campaigns by ROAS when winners are highlighted.
    pub rank: Option<u8>,
}

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub range: DateRange,
    pub record_count: usize,
    pub campaigns: Vec<CampaignRow>,
    pub totals: Totals,
    pub funnel: Vec<FunnelStage>,
    pub platforms: Vec<PlatformBreakdown>,
    pub alerts: AlertCounts,
    pub thresholds: Thresholds,
    pub generated_at: DateTime<Utc>,
}

impl DashboardReport {
    pub fn build(records: &[RawRecord], range: DateRange, settings: &Settings) -> Self {
        let filtered = filter_by_range(records, &range);
        let campaigns = aggregate_campaigns(filtered.iter().copied());
        let thresholds = Thresholds::from_settings(settings);
        let ranks = winner_ranks(&campaigns, settings.highlight_winners);

        let totals = Totals::from_campaigns(&campaigns);
        let funnel = funnel(&campaigns);
        let platforms = platform_breakdown(&campaigns);
        let alerts = count_alerts(&campaigns, &thresholds);

        info!(
            start = %range.start,
            end = %range.end,
            records = filtered.len(),
            campaigns = campaigns.len(),
            high = alerts.high_performers,
            low = alerts.low_performers,
            "Dashboard report built"
        );

        let rows = campaigns
            .into_iter()
            .map(|campaign| CampaignRow {
                tier: classify(&campaign, &thresholds),
                meets_cpa_target: meets_cpa_target(&campaign, &thresholds),
                rank: ranks.get(&campaign.id).copied(),
                campaign,
            })
            .collect();

        Self {
            range,
            record_count: filtered.len(),
            campaigns: rows,
            totals,
            funnel,
            platforms,
            alerts,
            thresholds,
            generated_at: Utc::now(),
        }
    }

    /// Compact per-campaign view sent to the insight service.
    pub fn insight_summary(&self) -> Vec<CampaignSummary> {
        self.campaigns
            .iter()
            .map(|row| CampaignSummary::from(&row.campaign))
            .collect()
    }
}

/// The fields of a campaign the insight service reasons about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignSummary {
    pub name: String,
    pub platform: Platform,
    pub spend: f64,
    pub roas: f64,
    pub cpa: f64,
    pub ctr: f64,
}

impl From<&CampaignMetrics> for CampaignSummary {
    fn from(c: &CampaignMetrics) -> Self {
        Self {
            name: c.campaign_name.clone(),
            platform: c.platform,
            spend: c.counters.spend,
            roas: c.metrics.roas,
            cpa: c.metrics.cost_per_purchase,
            ctr: c.metrics.ctr,
        }
    }
}

/// Forecast view: the scenario itself plus a chart series that puts recent
/// history in front of the projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    #[serde(flatten)]
    pub forecast: Forecast,
    pub history_days: usize,
    pub chart: Vec<ForecastPoint>,
    pub generated_at: DateTime<Utc>,
}

impl ForecastReport {
    /// Uses the full, unfiltered record set.
    pub fn build(
        records: &[RawRecord],
        params: ScenarioParams,
        baseline_window: usize,
        chart_history_days: usize,
    ) -> Self {
        let history = aggregate_daily(records);
        let forecast = Forecast::run(&history, baseline_window, params);
        let chart = chart_series(&history, &forecast.points, chart_history_days);

        info!(
            history_days = history.len(),
            horizon = forecast.points.len(),
            total_spend = forecast.summary.total_spend,
            total_revenue = forecast.summary.total_revenue,
            "Forecast report built"
        );

        Self {
            forecast,
            history_days: history.len(),
            chart,
            generated_at: Utc::now(),
        }
    }

    pub fn scenario_summary(&self) -> ScenarioSummary {
        let f = &self.forecast;
        ScenarioSummary {
            average_daily_spend: f.baseline.average_daily_spend,
            average_roas: f.baseline.average_roas,
            budget_growth_pct: f.params.budget_growth_pct,
            roas_change_pct: f.params.roas_change_pct,
            horizon_days: f.params.horizon_days,
            total_spend: f.summary.total_spend,
            total_revenue: f.summary.total_revenue,
        }
    }
}

/// Baseline, adjustments and projected totals sent to the insight service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub average_daily_spend: f64,
    pub average_roas: f64,
    pub budget_growth_pct: f64,
    pub roas_change_pct: f64,
    pub horizon_days: u32,
    pub total_spend: f64,
    pub total_revenue: f64,
}
