//! Performance classification against the operator's ROAS/CPA thresholds,
//! and the top-three ROAS ranking.

use crate::metrics::CampaignMetrics;
use adpulse_core::Settings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Campaigns at or below this spend are never flagged as low performers,
/// so near-zero test campaigns do not raise alarms.
pub const LOW_PERFORMER_SPEND_FLOOR: f64 = 50.0;

/// Number of campaigns that receive a winner rank.
pub const WINNER_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub target_roas: f64,
    pub warning_roas: f64,
    pub target_cpa: f64,
    pub spend_floor: f64,
}

impl Thresholds {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            target_roas: settings.target_roas,
            warning_roas: settings.warning_roas,
            target_cpa: settings.target_cpa,
            spend_floor: LOW_PERFORMER_SPEND_FLOOR,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// ROAS at or above target.
    High,
    /// Meaningful spend with ROAS at or below the warning level.
    Low,
    Neutral,
}

/// Classify one campaign. High takes precedence, so a campaign is never both.
pub fn classify(campaign: &CampaignMetrics, thresholds: &Thresholds) -> PerformanceTier {
    if campaign.roas() >= thresholds.target_roas {
        PerformanceTier::High
    } else if campaign.spend() > thresholds.spend_floor && campaign.roas() <= thresholds.warning_roas {
        PerformanceTier::Low
    } else {
        PerformanceTier::Neutral
    }
}

/// Whether the campaign converts at or under the target CPA. Campaigns with
/// no purchases have no CPA and never meet the target.
pub fn meets_cpa_target(campaign: &CampaignMetrics, thresholds: &Thresholds) -> bool {
    campaign.counters.purchases > 0.0 && campaign.metrics.cost_per_purchase <= thresholds.target_cpa
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertCounts {
    pub high_performers: usize,
    pub low_performers: usize,
}

pub fn count_alerts(campaigns: &[CampaignMetrics], thresholds: &Thresholds) -> AlertCounts {
    campaigns
        .iter()
        .fold(AlertCounts::default(), |mut acc, c| {
            match classify(c, thresholds) {
                PerformanceTier::High => acc.high_performers += 1,
                PerformanceTier::Low => acc.low_performers += 1,
                PerformanceTier::Neutral => {}
            }
            acc
        })
}

/// Campaigns with spend, best ROAS first. Equal ROAS keeps input order.
pub fn rank_by_roas(campaigns: &[CampaignMetrics]) -> Vec<&CampaignMetrics> {
    let mut ranked: Vec<&CampaignMetrics> = campaigns.iter().filter(|c| c.spend() > 0.0).collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.roas().total_cmp(&a.roas()));
    ranked
}

/// Rank 1..=3 keyed by campaign id, or empty when highlighting is off.
pub fn winner_ranks(campaigns: &[CampaignMetrics], highlight_winners: bool) -> HashMap<String, u8> {
    if !highlight_winners {
        return HashMap::new();
    }
    rank_by_roas(campaigns)
        .into_iter()
        .take(WINNER_SLOTS)
        .zip(1u8..)
        .map(|(c, rank)| (c.id.clone(), rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpulse_core::{Counters, Platform};

    fn campaign(id: &str, spend: f64, revenue: f64, purchases: f64) -> CampaignMetrics {
        CampaignMetrics::derive(
            id.to_string(),
            id.to_string(),
            Platform::Meta,
            1,
            Counters {
                spend,
                purchases,
                purchase_value: revenue,
                ..Default::default()
            },
        )
    }

    fn thresholds() -> Thresholds {
        Thresholds::from_settings(&Settings::default())
    }

    #[test]
    fn test_high_and_low() {
        let t = thresholds();
        assert_eq!(classify(&campaign("a", 100.0, 400.0, 1.0), &t), PerformanceTier::High);
        assert_eq!(classify(&campaign("b", 100.0, 150.0, 1.0), &t), PerformanceTier::Low);
        assert_eq!(classify(&campaign("c", 100.0, 200.0, 1.0), &t), PerformanceTier::Neutral);
    }

    #[test]
    fn test_spend_at_floor_never_low() {
        let t = thresholds();
        assert_eq!(classify(&campaign("a", 50.0, 0.0, 0.0), &t), PerformanceTier::Neutral);
        assert_eq!(classify(&campaign("b", 10.0, 1.0, 0.0), &t), PerformanceTier::Neutral);
        assert_eq!(classify(&campaign("c", 0.0, 0.0, 0.0), &t), PerformanceTier::Neutral);
        assert_eq!(classify(&campaign("d", 50.01, 0.0, 0.0), &t), PerformanceTier::Low);
    }

    #[test]
    fn test_counts_are_disjoint_even_with_overlapping_thresholds() {
        let t = Thresholds {
            target_roas: 2.0,
            warning_roas: 3.0,
            target_cpa: 50.0,
            spend_floor: LOW_PERFORMER_SPEND_FLOOR,
        };
        let campaigns = vec![
            campaign("a", 100.0, 250.0, 1.0),
            campaign("b", 100.0, 100.0, 1.0),
            campaign("c", 100.0, 500.0, 1.0),
        ];
        let counts = count_alerts(&campaigns, &t);
        assert_eq!(counts.high_performers, 2);
        assert_eq!(counts.low_performers, 1);
        assert!(counts.high_performers + counts.low_performers <= campaigns.len());
    }

    #[test]
    fn test_cpa_target() {
        let t = thresholds();
        assert!(meets_cpa_target(&campaign("a", 100.0, 0.0, 4.0), &t));
        assert!(!meets_cpa_target(&campaign("b", 100.0, 0.0, 1.0), &t));
        assert!(!meets_cpa_target(&campaign("c", 100.0, 0.0, 0.0), &t));
    }

    #[test]
    fn test_ranking_excludes_zero_spend_and_is_stable() {
        let campaigns = vec![
            campaign("zero", 0.0, 0.0, 0.0),
            campaign("tie-first", 100.0, 300.0, 1.0),
            campaign("best", 100.0, 500.0, 1.0),
            campaign("tie-second", 200.0, 600.0, 1.0),
            campaign("low", 100.0, 50.0, 1.0),
        ];
        let ranked: Vec<_> = rank_by_roas(&campaigns)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["best", "tie-first", "tie-second", "low"]);

        let ranks = winner_ranks(&campaigns, true);
        assert_eq!(ranks.len(), 3);
        assert_eq!(ranks.get("best"), Some(&1));
        assert_eq!(ranks.get("tie-first"), Some(&2));
        assert_eq!(ranks.get("tie-second"), Some(&3));
        assert!(!ranks.contains_key("zero"));
    }

    #[test]
    fn test_no_ranks_when_highlight_disabled() {
        let campaigns = vec![campaign("a", 100.0, 500.0, 1.0)];
        assert!(winner_ranks(&campaigns, false).is_empty());
    }

    #[test]
    fn test_fewer_than_three_candidates() {
        let campaigns = vec![campaign("a", 100.0, 100.0, 1.0), campaign("b", 0.0, 0.0, 0.0)];
        let ranks = winner_ranks(&campaigns, true);
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks.get("a"), Some(&1));
    }
}
