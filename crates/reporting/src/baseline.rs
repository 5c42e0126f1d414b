//! Trailing-window baseline used as the forecast's starting point.

use crate::daily::DailyAggregate;
use crate::metrics::safe_div;
use serde::{Deserialize, Serialize};

/// Trailing days averaged when no window is configured.
pub const DEFAULT_BASELINE_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub average_daily_spend: f64,
    /// Blended ROAS over the window (see [`estimate_baseline`]).
    pub average_roas: f64,
    /// Number of historical days the averages were computed from.
    pub days_used: usize,
}

impl Baseline {
    pub fn is_empty(&self) -> bool {
        self.days_used == 0
    }
}

/// Average the last `window` days of an ascending daily series.
///
/// Uses every day when fewer than `window` exist. Spend is a plain mean per
/// day. ROAS is *blended*: total revenue over total spend across the window,
/// not the mean of each day's ROAS. The two differ whenever daily spend is
/// uneven, and the forecast depends on the blended figure.
pub fn estimate_baseline(days: &[DailyAggregate], window: usize) -> Baseline {
    let recent = &days[days.len().saturating_sub(window)..];
    if recent.is_empty() {
        return Baseline::default();
    }

    let total_spend: f64 = recent.iter().map(|d| d.spend).sum();
    let total_revenue: f64 = recent.iter().map(|d| d.revenue).sum();

    Baseline {
        average_daily_spend: total_spend / recent.len() as f64,
        average_roas: safe_div(total_revenue, total_spend),
        days_used: recent.len(),
    }
}
