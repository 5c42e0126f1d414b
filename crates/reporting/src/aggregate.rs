//! Campaign aggregation. Folds daily records into one row per
//! (campaign name, platform) and derives metrics for each row.

use crate::metrics::CampaignMetrics;
use adpulse_core::{Counters, Platform, RawRecord};
use std::collections::HashMap;
use tracing::debug;

/// Summed counters for one (campaign name, platform) group, before ratios
/// are derived.
#[derive(Debug, Clone, PartialEq)]
struct AggregatedCampaign {
    /// `"{campaign_name}-{platform}"`.
    id: String,
    campaign_name: String,
    platform: Platform,
    record_count: usize,
    counters: Counters,
}

impl AggregatedCampaign {
    fn seed(record: &RawRecord) -> Self {
        Self {
            id: record.campaign_key(),
            campaign_name: record.campaign_name.clone(),
            platform: record.platform,
            record_count: 1,
            counters: record.counters,
        }
    }

    fn absorb(&mut self, record: &RawRecord) {
        self.counters.accumulate(&record.counters);
        self.record_count += 1;
    }

    fn into_metrics(self) -> CampaignMetrics {
        CampaignMetrics::derive(
            self.id,
            self.campaign_name,
            self.platform,
            self.record_count,
            self.counters,
        )
    }
}

/// Group records by (campaign name, platform) in a single pass, keeping
/// groups in first-seen order.
fn group_campaigns<'a, I>(records: I) -> Vec<AggregatedCampaign>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut index: HashMap<(&'a str, Platform), usize> = HashMap::new();
    let mut groups: Vec<AggregatedCampaign> = Vec::new();

    for record in records {
        let key = (record.campaign_name.as_str(), record.platform);
        match index.get(&key) {
            Some(&slot) => groups[slot].absorb(record),
            None => {
                index.insert(key, groups.len());
                groups.push(AggregatedCampaign::seed(record));
            }
        }
    }

    groups
}

/// Aggregate records into per-campaign metrics. Ratios are derived after all
/// sums are complete.
pub fn aggregate_campaigns<'a, I>(records: I) -> Vec<CampaignMetrics>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let groups = group_campaigns(records);
    debug!(campaigns = groups.len(), "Aggregated campaign groups");
    groups
        .into_iter()
        .map(AggregatedCampaign::into_metrics)
        .collect()
}
