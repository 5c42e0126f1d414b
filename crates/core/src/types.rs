use crate::error::{AdPulseError, AdPulseResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Advertising platform a campaign runs on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Google,
    Snapchat,
    Tiktok,
    Meta,
    X,
}

impl Platform {
    /// Every platform, in display order.
    pub const ALL: [Platform; 5] = [
        Platform::Google,
        Platform::Snapchat,
        Platform::Tiktok,
        Platform::Meta,
        Platform::X,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Snapchat => "snapchat",
            Platform::Tiktok => "tiktok",
            Platform::Meta => "meta",
            Platform::X => "x",
        }
    }

    /// Human-readable name for reports and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Google => "Google",
            Platform::Snapchat => "Snapchat",
            Platform::Tiktok => "TikTok",
            Platform::Meta => "Meta (FB/IG)",
            Platform::X => "X (Twitter)",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eleven raw counters entered for a campaign day.
///
/// Counts are kept as `f64` because the data-entry side hands them over as
/// plain numbers and every consumer divides them anyway.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub spend: f64,
    pub impressions: f64,
    pub unique_link_clicks: f64,
    pub landing_page_views: f64,
    pub content_views: f64,
    pub add_to_carts: f64,
    pub add_to_cart_value: f64,
    pub add_payment_info: f64,
    pub add_payment_info_value: f64,
    pub purchases: f64,
    pub purchase_value: f64,
}

impl Counters {
    /// Add every counter of `other` into `self`.
    pub fn accumulate(&mut self, other: &Counters) {
        self.spend += other.spend;
        self.impressions += other.impressions;
        self.unique_link_clicks += other.unique_link_clicks;
        self.landing_page_views += other.landing_page_views;
        self.content_views += other.content_views;
        self.add_to_carts += other.add_to_carts;
        self.add_to_cart_value += other.add_to_cart_value;
        self.add_payment_info += other.add_payment_info;
        self.add_payment_info_value += other.add_payment_info_value;
        self.purchases += other.purchases;
        self.purchase_value += other.purchase_value;
    }

    /// Named view over all counters, used for boundary validation.
    pub fn fields(&self) -> [(&'static str, f64); 11] {
        [
            ("spend", self.spend),
            ("impressions", self.impressions),
            ("uniqueLinkClicks", self.unique_link_clicks),
            ("landingPageViews", self.landing_page_views),
            ("contentViews", self.content_views),
            ("addToCarts", self.add_to_carts),
            ("addToCartValue", self.add_to_cart_value),
            ("addPaymentInfo", self.add_payment_info),
            ("addPaymentInfoValue", self.add_payment_info_value),
            ("purchases", self.purchases),
            ("purchaseValue", self.purchase_value),
        ]
    }

    /// Reject negative, NaN or infinite counters.
    pub fn validate(&self) -> AdPulseResult<()> {
        for (name, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(AdPulseError::Validation(format!(
                    "counter '{}' must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// One daily observation for one campaign on one platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: String,
    pub date: NaiveDate,
    pub campaign_name: String,
    pub platform: Platform,
    #[serde(flatten)]
    pub counters: Counters,
}

impl RawRecord {
    /// Create a record with a freshly generated identity.
    pub fn new(
        date: NaiveDate,
        campaign_name: impl Into<String>,
        platform: Platform,
        counters: Counters,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            campaign_name: campaign_name.into(),
            platform,
            counters,
        }
    }

    /// Grouping key shared by every record of the same campaign on the same
    /// platform. Distinct campaigns with identical names collide on purpose.
    pub fn campaign_key(&self) -> String {
        format!("{}-{}", self.campaign_name, self.platform)
    }

    pub fn validate(&self) -> AdPulseResult<()> {
        if self.campaign_name.trim().is_empty() {
            return Err(AdPulseError::Validation(format!(
                "record '{}' has an empty campaign name",
                self.id
            )));
        }
        self.counters.validate()
    }
}
