//! Inclusive date-range selection over daily records, plus the quick-pick
//! presets offered by the date picker.

use adpulse_core::{AdPulseError, RawRecord};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive `[start, end]` calendar range. A range with `start > end` is
/// allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Select the records dated inside `range`, preserving input order.
///
/// Accepts any iterator of record references so an already-filtered slice
/// can be filtered again.
pub fn filter_by_range<'a, I>(records: I, range: &DateRange) -> Vec<&'a RawRecord>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    if range.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| range.contains(r.date))
        .collect()
}

/// Relative ranges offered as one-click choices. Serializes as snake_case;
/// the camelCase names used by the date picker are accepted on input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    Last7,
    Last30,
    #[serde(alias = "thisMonth")]
    ThisMonth,
    #[serde(alias = "lastMonth")]
    LastMonth,
    #[serde(alias = "yearToDate")]
    YearToDate,
}

impl DateRangePreset {
    /// Resolve the preset against `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let first_of_month = today - Duration::days(today.day0() as i64);
        match self {
            Self::Today => DateRange::single_day(today),
            Self::Yesterday => DateRange::single_day(today - Duration::days(1)),
            Self::Last7 => DateRange::new(today - Duration::days(6), today),
            Self::Last30 => DateRange::new(today - Duration::days(29), today),
            Self::ThisMonth => DateRange::new(first_of_month, today),
            Self::LastMonth => {
                let last_of_prev = first_of_month - Duration::days(1);
                let first_of_prev = last_of_prev - Duration::days(last_of_prev.day0() as i64);
                DateRange::new(first_of_prev, last_of_prev)
            }
            Self::YearToDate => {
                DateRange::new(today - Duration::days(today.ordinal0() as i64), today)
            }
        }
    }
}

impl FromStr for DateRangePreset {
    type Err = AdPulseError;

    /// Accepts the same names as the JSON form, e.g. `last7`, `this_month`
    /// or `thisMonth`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "last7" => Ok(Self::Last7),
            "last30" => Ok(Self::Last30),
            "this_month" | "thisMonth" => Ok(Self::ThisMonth),
            "last_month" | "lastMonth" => Ok(Self::LastMonth),
            "year_to_date" | "yearToDate" => Ok(Self::YearToDate),
            other => Err(AdPulseError::Validation(format!("unknown date preset '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpulse_core::{Counters, Platform};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate, name: &str) -> RawRecord {
        RawRecord {
            id: format!("{}-{}", name, date),
            date,
            campaign_name: name.to_string(),
            platform: Platform::Google,
            counters: Counters {
                spend: 10.0,
                ..Default::default()
            },
        }
    }

    fn sample() -> Vec<RawRecord> {
        vec![
            record(day(2024, 3, 1), "a"),
            record(day(2024, 3, 5), "b"),
            record(day(2024, 3, 10), "c"),
            record(day(2024, 3, 15), "d"),
        ]
    }

    #[test]
    fn test_inclusive_bounds() {
        let records = sample();
        let range = DateRange::new(day(2024, 3, 5), day(2024, 3, 10));
        let filtered = filter_by_range(&records, &range);
        let names: Vec<_> = filtered.iter().map(|r| r.campaign_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_empty_input_and_disjoint_range() {
        let empty: Vec<RawRecord> = Vec::new();
        let range = DateRange::new(day(2024, 1, 1), day(2024, 12, 31));
        assert!(filter_by_range(&empty, &range).is_empty());

        let records = sample();
        let disjoint = DateRange::new(day(2023, 1, 1), day(2023, 12, 31));
        assert!(filter_by_range(&records, &disjoint).is_empty());
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let records = sample();
        let range = DateRange::new(day(2024, 3, 10), day(2024, 3, 1));
        assert!(range.is_empty());
        assert!(filter_by_range(&records, &range).is_empty());
    }

    #[test]
    fn test_inverted_range_skips_iteration() {
        let range = DateRange::new(day(2024, 3, 10), day(2024, 3, 1));
        let untouched = std::iter::from_fn(|| -> Option<&RawRecord> { panic!("records iterated") });
        assert!(filter_by_range(untouched, &range).is_empty());
    }

    #[test]
    fn test_idempotent_and_subset() {
        let records = sample();
        let range = DateRange::new(day(2024, 3, 2), day(2024, 3, 15));
        let once = filter_by_range(&records, &range);
        let twice = filter_by_range(once.iter().copied(), &range);
        assert_eq!(once, twice);
        for r in &once {
            assert!(records.iter().any(|orig| orig == *r));
        }
    }

    #[test]
    fn test_presets() {
        let today = day(2024, 3, 15);
        assert_eq!(DateRangePreset::Today.resolve(today), DateRange::single_day(today));
        assert_eq!(
            DateRangePreset::Yesterday.resolve(today),
            DateRange::single_day(day(2024, 3, 14))
        );
        assert_eq!(
            DateRangePreset::Last7.resolve(today),
            DateRange::new(day(2024, 3, 9), today)
        );
        assert_eq!(
            DateRangePreset::Last30.resolve(today),
            DateRange::new(day(2024, 2, 15), today)
        );
        assert_eq!(
            DateRangePreset::ThisMonth.resolve(today),
            DateRange::new(day(2024, 3, 1), today)
        );
        // 2024 is a leap year.
        assert_eq!(
            DateRangePreset::LastMonth.resolve(today),
            DateRange::new(day(2024, 2, 1), day(2024, 2, 29))
        );
        assert_eq!(
            DateRangePreset::YearToDate.resolve(today),
            DateRange::new(day(2024, 1, 1), today)
        );
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        let range = DateRangePreset::LastMonth.resolve(day(2024, 1, 20));
        assert_eq!(range, DateRange::new(day(2023, 12, 1), day(2023, 12, 31)));
    }

    #[test]
    fn test_preset_from_str_matches_serde() {
        for name in ["today", "yesterday", "last7", "last30", "this_month", "last_month", "year_to_date"] {
            let parsed: DateRangePreset = name.parse().unwrap();
            let json = serde_json::to_value(parsed).unwrap();
            assert_eq!(json, name);
        }
        assert!("last_week".parse::<DateRangePreset>().is_err());
    }

    #[test]
    fn test_preset_accepts_camel_case_names() {
        let cases = [
            ("thisMonth", DateRangePreset::ThisMonth, "this_month"),
            ("lastMonth", DateRangePreset::LastMonth, "last_month"),
            ("yearToDate", DateRangePreset::YearToDate, "year_to_date"),
        ];
        for (camel, preset, snake) in cases {
            let from_json: DateRangePreset = serde_json::from_value(serde_json::json!(camel)).unwrap();
            assert_eq!(from_json, preset);
            assert_eq!(camel.parse::<DateRangePreset>().unwrap(), preset);
            assert_eq!(serde_json::to_value(preset).unwrap(), snake);
        }
    }
}
