//! Headline totals, conversion funnel, and per-platform breakdown.

use crate::metrics::{safe_div, CampaignMetrics};
use adpulse_core::{Counters, Platform, RawRecord};
use serde::{Deserialize, Serialize};

/// Headline numbers for the selected range.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub spend: f64,
    pub impressions: f64,
    pub purchases: f64,
    /// Sum of purchase value.
    pub revenue: f64,
    /// Sum of unique link clicks.
    pub clicks: f64,
    pub add_to_carts: f64,
    pub overall_roas: f64,
    pub overall_cpa: f64,
    /// Percentage.
    pub overall_ctr: f64,
}

impl Totals {
    /// Reduce aggregated campaign rows.
    pub fn from_campaigns(campaigns: &[CampaignMetrics]) -> Self {
        Self::reduce(campaigns.iter().map(|c| &c.counters))
    }

    /// Reduce raw records directly. Gives the same result as aggregating the
    /// same records first and calling [`Totals::from_campaigns`].
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        Self::reduce(records.into_iter().map(|r| &r.counters))
    }

    fn reduce<'a>(counters: impl Iterator<Item = &'a Counters>) -> Self {
        let mut t = counters.fold(Totals::default(), |mut acc, c| {
            acc.spend += c.spend;
            acc.impressions += c.impressions;
            acc.purchases += c.purchases;
            acc.revenue += c.purchase_value;
            acc.clicks += c.unique_link_clicks;
            acc.add_to_carts += c.add_to_carts;
            acc
        });
        t.overall_roas = safe_div(t.revenue, t.spend);
        t.overall_cpa = safe_div(t.spend, t.purchases);
        t.overall_ctr = safe_div(t.clicks, t.impressions) * 100.0;
        t
    }
}

// ─── Funnel ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStageKind {
    Impressions,
    Clicks,
    ContentViews,
    AddToCart,
    AddPaymentInfo,
    Purchases,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelStage {
    pub stage: FunnelStageKind,
    pub value: f64,
}

/// Funnel from impressions down to purchases, top to bottom.
pub fn funnel(campaigns: &[CampaignMetrics]) -> Vec<FunnelStage> {
    let mut sum = Counters::default();
    for c in campaigns {
        sum.accumulate(&c.counters);
    }

    [
        (FunnelStageKind::Impressions, sum.impressions),
        (FunnelStageKind::Clicks, sum.unique_link_clicks),
        (FunnelStageKind::ContentViews, sum.content_views),
        (FunnelStageKind::AddToCart, sum.add_to_carts),
        (FunnelStageKind::AddPaymentInfo, sum.add_payment_info),
        (FunnelStageKind::Purchases, sum.purchases),
    ]
    .into_iter()
    .map(|(stage, value)| FunnelStage { stage, value })
    .collect()
}

// ─── Platform breakdown ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformBreakdown {
    pub platform: Platform,
    pub spend: f64,
    pub revenue: f64,
    /// Blended: total revenue over total spend for the platform.
    pub roas: f64,
    pub campaigns: usize,
}

/// Spend, revenue and blended ROAS per platform, in [`Platform::ALL`] order.
/// Platforms with no campaigns are omitted.
pub fn platform_breakdown(campaigns: &[CampaignMetrics]) -> Vec<PlatformBreakdown> {
    let mut slots: [(f64, f64, usize); Platform::ALL.len()] = [(0.0, 0.0, 0); Platform::ALL.len()];

    for c in campaigns {
        let idx = c.platform as usize;
        slots[idx].0 += c.counters.spend;
        slots[idx].1 += c.counters.purchase_value;
        slots[idx].2 += 1;
    }

    Platform::ALL
        .iter()
        .zip(slots)
        .filter(|(_, (_, _, count))| *count > 0)
        .map(|(&platform, (spend, revenue, count))| PlatformBreakdown {
            platform,
            spend,
            revenue,
            roas: safe_div(revenue, spend),
            campaigns: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_campaigns;
    use chrono::NaiveDate;

    fn record(d: u32, name: &str, platform: Platform, counters: Counters) -> RawRecord {
        RawRecord {
            id: format!("{}-{}", name, d),
            date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
            campaign_name: name.to_string(),
            platform,
            counters,
        }
    }

    fn sample() -> Vec<RawRecord> {
        vec![
            record(
                1,
                "Search",
                Platform::Google,
                Counters {
                    spend: 450.0,
                    impressions: 2500.0,
                    unique_link_clicks: 200.0,
                    content_views: 150.0,
                    add_to_carts: 20.0,
                    add_payment_info: 10.0,
                    purchases: 5.0,
                    purchase_value: 1800.0,
                    ..Default::default()
                },
            ),
            record(
                2,
                "Search",
                Platform::Google,
                Counters {
                    spend: 150.0,
                    impressions: 500.0,
                    unique_link_clicks: 50.0,
                    purchases: 1.0,
                    purchase_value: 200.0,
                    ..Default::default()
                },
            ),
            record(
                1,
                "Video",
                Platform::Snapchat,
                Counters {
                    spend: 300.0,
                    impressions: 15000.0,
                    unique_link_clicks: 120.0,
                    content_views: 50.0,
                    add_to_carts: 5.0,
                    add_payment_info: 2.0,
                    purchases: 1.0,
                    purchase_value: 360.0,
                    ..Default::default()
                },
            ),
        ]
    }

    #[test]
    fn test_totals_and_ratios() {
        let campaigns = aggregate_campaigns(&sample());
        let t = Totals::from_campaigns(&campaigns);
        assert!((t.spend - 900.0).abs() < 1e-9);
        assert!((t.revenue - 2360.0).abs() < 1e-9);
        assert!((t.purchases - 7.0).abs() < 1e-9);
        assert!((t.clicks - 370.0).abs() < 1e-9);
        assert!((t.impressions - 18000.0).abs() < 1e-9);
        assert!((t.overall_roas - 2360.0 / 900.0).abs() < 1e-9);
        assert!((t.overall_cpa - 900.0 / 7.0).abs() < 1e-9);
        assert!((t.overall_ctr - 370.0 / 18000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_both_reduction_paths_agree() {
        let records = sample();
        let via_campaigns = Totals::from_campaigns(&aggregate_campaigns(&records));
        let direct = Totals::from_records(&records);
        assert!((via_campaigns.spend - direct.spend).abs() < 1e-9);
        assert!((via_campaigns.revenue - direct.revenue).abs() < 1e-9);
        assert!((via_campaigns.clicks - direct.clicks).abs() < 1e-9);
        assert!((via_campaigns.overall_roas - direct.overall_roas).abs() < 1e-9);
        assert!((via_campaigns.overall_cpa - direct.overall_cpa).abs() < 1e-9);
        assert!((via_campaigns.overall_ctr - direct.overall_ctr).abs() < 1e-9);
    }

    #[test]
    fn test_empty_totals_are_zero() {
        let t = Totals::from_campaigns(&[]);
        assert_eq!(t, Totals::default());
    }

    #[test]
    fn test_funnel_order_and_values() {
        let stages = funnel(&aggregate_campaigns(&sample()));
        let kinds: Vec<_> = stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            kinds,
            vec![
                FunnelStageKind::Impressions,
                FunnelStageKind::Clicks,
                FunnelStageKind::ContentViews,
                FunnelStageKind::AddToCart,
                FunnelStageKind::AddPaymentInfo,
                FunnelStageKind::Purchases,
            ]
        );
        assert!((stages[2].value - 200.0).abs() < 1e-9);
        assert!((stages[5].value - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_platform_breakdown() {
        let mut records = sample();
        records.push(record(
            3,
            "Brand",
            Platform::Google,
            Counters {
                spend: 100.0,
                purchase_value: 100.0,
                ..Default::default()
            },
        ));
        let breakdown = platform_breakdown(&aggregate_campaigns(&records));
        assert_eq!(breakdown.len(), 2);

        assert_eq!(breakdown[0].platform, Platform::Google);
        assert_eq!(breakdown[0].campaigns, 2);
        assert!((breakdown[0].spend - 700.0).abs() < 1e-9);
        assert!((breakdown[0].roas - 2100.0 / 700.0).abs() < 1e-9);

        assert_eq!(breakdown[1].platform, Platform::Snapchat);
        assert!((breakdown[1].roas - 1.2).abs() < 1e-9);
    }
}
