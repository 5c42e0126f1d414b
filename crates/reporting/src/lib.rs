//! Campaign performance reporting: metric derivation, date-range
//! aggregation, totals, performance classification, and baseline-driven
//! scenario forecasting.

pub mod aggregate;
pub mod baseline;
pub mod classifier;
pub mod daily;
pub mod forecast;
pub mod metrics;
pub mod range;
pub mod report;
pub mod totals;

pub use aggregate::aggregate_campaigns;
pub use baseline::{estimate_baseline, Baseline, DEFAULT_BASELINE_WINDOW};
pub use classifier::{AlertCounts, PerformanceTier, Thresholds, LOW_PERFORMER_SPEND_FLOOR};
pub use daily::{aggregate_daily, DailyAggregate};
pub use forecast::{Forecast, ForecastPoint, ForecastSummary, ScenarioParams};
pub use metrics::{CampaignMetrics, DerivedMetrics};
pub use range::{filter_by_range, DateRange, DateRangePreset};
pub use report::{CampaignSummary, DashboardReport, ForecastReport, ScenarioSummary};
pub use totals::Totals;
