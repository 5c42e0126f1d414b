//! Derived performance ratios (CPM, CTR, CPA, ROAS, ...) computed from raw
//! counters.
//!
//! Every ratio whose denominator is zero is exactly `0.0`. Nothing in this
//! module can produce NaN or infinity for non-negative inputs.

use adpulse_core::{Counters, Platform};
use serde::{Deserialize, Serialize};

/// Zero-guarded division: `numerator / denominator`, or `0.0` when the
/// denominator is not positive.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// The ten ratios derived from a set of counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Cost per thousand impressions.
    pub cpm: f64,
    pub cost_per_unique_link_click: f64,
    /// Percentage.
    pub ctr: f64,
    pub cost_per_landing_page_view: f64,
    pub cost_per_content_view: f64,
    pub cost_per_add_to_cart: f64,
    pub cost_per_add_payment_info: f64,
    /// CPA.
    pub cost_per_purchase: f64,
    /// Purchases per unique link click, percentage.
    pub conversion_rate: f64,
    pub roas: f64,
}

impl DerivedMetrics {
    pub fn from_counters(c: &Counters) -> Self {
        Self {
            cpm: safe_div(c.spend, c.impressions) * 1000.0,
            cost_per_unique_link_click: safe_div(c.spend, c.unique_link_clicks),
            ctr: safe_div(c.unique_link_clicks, c.impressions) * 100.0,
            cost_per_landing_page_view: safe_div(c.spend, c.landing_page_views),
            cost_per_content_view: safe_div(c.spend, c.content_views),
            cost_per_add_to_cart: safe_div(c.spend, c.add_to_carts),
            cost_per_add_payment_info: safe_div(c.spend, c.add_payment_info),
            cost_per_purchase: safe_div(c.spend, c.purchases),
            conversion_rate: safe_div(c.purchases, c.unique_link_clicks) * 100.0,
            roas: safe_div(c.purchase_value, c.spend),
        }
    }
}

/// A campaign's (possibly summed) counters together with the ratios derived
/// from them.
///
/// Only constructed through [`CampaignMetrics::derive`], so the ratios always
/// match the counters they sit next to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub id: String,
    pub campaign_name: String,
    pub platform: Platform,
    /// Number of daily records folded into this row.
    pub record_count: usize,
    #[serde(flatten)]
    pub counters: Counters,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl CampaignMetrics {
    pub fn derive(
        id: String,
        campaign_name: String,
        platform: Platform,
        record_count: usize,
        counters: Counters,
    ) -> Self {
        Self {
            id,
            campaign_name,
            platform,
            record_count,
            metrics: DerivedMetrics::from_counters(&counters),
            counters,
        }
    }

    pub fn spend(&self) -> f64 {
        self.counters.spend
    }

    pub fn roas(&self) -> f64 {
        self.metrics.roas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_counters() -> Counters {
        Counters {
            spend: 450.0,
            impressions: 2500.0,
            unique_link_clicks: 200.0,
            landing_page_views: 180.0,
            content_views: 150.0,
            add_to_carts: 20.0,
            add_to_cart_value: 6000.0,
            add_payment_info: 10.0,
            add_payment_info_value: 3000.0,
            purchases: 5.0,
            purchase_value: 1800.0,
        }
    }

    fn all_ratios(m: &DerivedMetrics) -> [f64; 10] {
        [
            m.cpm,
            m.cost_per_unique_link_click,
            m.ctr,
            m.cost_per_landing_page_view,
            m.cost_per_content_view,
            m.cost_per_add_to_cart,
            m.cost_per_add_payment_info,
            m.cost_per_purchase,
            m.conversion_rate,
            m.roas,
        ]
    }

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert!((safe_div(9.0, 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_derived_values() {
        let m = DerivedMetrics::from_counters(&full_counters());
        assert!((m.cpm - 180.0).abs() < 1e-9);
        assert!((m.cost_per_unique_link_click - 2.25).abs() < 1e-9);
        assert!((m.ctr - 8.0).abs() < 1e-9);
        assert!((m.cost_per_landing_page_view - 2.5).abs() < 1e-9);
        assert!((m.cost_per_content_view - 3.0).abs() < 1e-9);
        assert!((m.cost_per_add_to_cart - 22.5).abs() < 1e-9);
        assert!((m.cost_per_add_payment_info - 45.0).abs() < 1e-9);
        assert!((m.cost_per_purchase - 90.0).abs() < 1e-9);
        assert!((m.conversion_rate - 2.5).abs() < 1e-9);
        assert!((m.roas - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_counters_give_exact_zeros() {
        let m = DerivedMetrics::from_counters(&Counters::default());
        for ratio in all_ratios(&m) {
            assert_eq!(ratio, 0.0);
        }
    }

    #[test]
    fn test_each_zero_denominator_in_isolation() {
        // Spend present but every denominator zero.
        let c = Counters {
            spend: 100.0,
            purchase_value: 0.0,
            ..Default::default()
        };
        let m = DerivedMetrics::from_counters(&c);
        for ratio in all_ratios(&m) {
            assert_eq!(ratio, 0.0);
        }

        // Revenue without spend.
        let c = Counters {
            purchase_value: 500.0,
            ..Default::default()
        };
        assert_eq!(DerivedMetrics::from_counters(&c).roas, 0.0);

        // Purchases without clicks.
        let c = Counters {
            purchases: 3.0,
            ..Default::default()
        };
        assert_eq!(DerivedMetrics::from_counters(&c).conversion_rate, 0.0);
    }

    #[test]
    fn test_ratios_finite_and_non_negative_over_sweep() {
        let values = [0.0, 0.5, 1.0, 3.0, 1e-9, 1e9];
        for &spend in &values {
            for &denominator in &values {
                let c = Counters {
                    spend,
                    impressions: denominator,
                    unique_link_clicks: denominator,
                    landing_page_views: denominator,
                    content_views: denominator,
                    add_to_carts: denominator,
                    add_payment_info: denominator,
                    purchases: spend,
                    purchase_value: denominator,
                    ..Default::default()
                };
                for ratio in all_ratios(&DerivedMetrics::from_counters(&c)) {
                    assert!(ratio.is_finite());
                    assert!(ratio >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_derive_keeps_identity() {
        let m = CampaignMetrics::derive(
            "Retargeting-meta".to_string(),
            "Retargeting".to_string(),
            Platform::Meta,
            3,
            full_counters(),
        );
        assert_eq!(m.id, "Retargeting-meta");
        assert_eq!(m.record_count, 3);
        assert!((m.spend() - 450.0).abs() < 1e-9);
        assert!((m.roas() - 4.0).abs() < 1e-9);
    }
}
