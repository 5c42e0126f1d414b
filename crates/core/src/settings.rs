//! Operator settings. Thresholds feed the performance classifier; the rest is
//! display-only and never touches a computation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Currency symbol shown next to amounts. No conversion is performed.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_target_roas", alias = "target_roas")]
    pub target_roas: f64,
    #[serde(default = "default_warning_roas", alias = "warning_roas")]
    pub warning_roas: f64,
    #[serde(default = "default_target_cpa", alias = "target_cpa")]
    pub target_cpa: f64,
    /// Percentage.
    #[serde(default = "default_tax_rate", alias = "tax_rate")]
    pub tax_rate: f64,
    #[serde(default = "default_monthly_budget", alias = "monthly_budget")]
    pub monthly_budget: f64,
    #[serde(default = "default_attribution_window", alias = "attribution_window")]
    pub attribution_window: String,
    #[serde(default = "default_true", alias = "show_impressions")]
    pub show_impressions: bool,
    #[serde(default = "default_theme_color", alias = "theme_color")]
    pub theme_color: String,
    /// Tag the top three campaigns by ROAS.
    #[serde(default = "default_true", alias = "highlight_winners")]
    pub highlight_winners: bool,
}

fn default_currency() -> String {
    "SAR".to_string()
}
fn default_target_roas() -> f64 {
    4.0
}
fn default_warning_roas() -> f64 {
    1.5
}
fn default_target_cpa() -> f64 {
    50.0
}
fn default_tax_rate() -> f64 {
    15.0
}
fn default_monthly_budget() -> f64 {
    50_000.0
}
fn default_attribution_window() -> String {
    "7-day click".to_string()
}
fn default_true() -> bool {
    true
}
fn default_theme_color() -> String {
    "indigo".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            target_roas: default_target_roas(),
            warning_roas: default_warning_roas(),
            target_cpa: default_target_cpa(),
            tax_rate: default_tax_rate(),
            monthly_budget: default_monthly_budget(),
            attribution_window: default_attribution_window(),
            show_impressions: default_true(),
            theme_color: default_theme_color(),
            highlight_winners: default_true(),
        }
    }
}
