//! Date-only aggregation feeding the forecast.

use crate::metrics::safe_div;
use adpulse_core::RawRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spend and revenue across every campaign and platform for one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub spend: f64,
    /// Sum of purchase value.
    pub revenue: f64,
    pub roas: f64,
}

/// One entry per distinct date present, ascending. Missing days are not
/// filled in, and the last element is always the most recent day.
pub fn aggregate_daily<'a, I>(records: I) -> Vec<DailyAggregate>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_date.entry(record.date).or_insert((0.0, 0.0));
        entry.0 += record.counters.spend;
        entry.1 += record.counters.purchase_value;
    }

    by_date
        .into_iter()
        .map(|(date, (spend, revenue))| DailyAggregate {
            date,
            spend,
            revenue,
            roas: safe_div(revenue, spend),
        })
        .collect()
}
