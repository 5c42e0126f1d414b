//! Prompt builders. Each prompt embeds the data it asks about so the model
//! never needs a second round trip.

use adpulse_core::Platform;
use adpulse_reporting::{CampaignSummary, ScenarioSummary};

/// Executive summary over the campaigns of the selected range.
pub fn campaign_analysis(campaigns: &[CampaignSummary]) -> String {
    let data = serde_json::to_string_pretty(campaigns).unwrap_or_else(|_| "[]".to_string());
    let platforms = platform_labels(campaigns);

    format!(
        "You are an expert in digital marketing and e-commerce.\n\
         Analyze the following ad campaign data and write a short executive summary.\n\
         Cover:\n\
         1. The best performing campaign and why.\n\
         2. A campaign that should be paused or improved.\n\
         3. One general recommendation for improving ROAS.\n\
         \n\
         Platforms: {platforms}\n\
         Data:\n\
         {data}\n\
         \n\
         Answer in concise bullet points."
    )
}

/// Display names of the platforms present, in canonical order.
fn platform_labels(campaigns: &[CampaignSummary]) -> String {
    let labels: Vec<&str> = Platform::ALL
        .iter()
        .filter(|p| campaigns.iter().any(|c| c.platform == **p))
        .map(|p| p.label())
        .collect();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}

/// Commentary on a what-if forecast scenario.
pub fn scenario_analysis(scenario: &ScenarioSummary) -> String {
    format!(
        "You are a financial analyst for an e-commerce business.\n\
         Current baseline: average daily spend {spend:.2}, average ROAS {roas:.2}.\n\
         Proposed scenario: change budget by {budget:+}% and expect ROAS to change by {roas_change:+}%.\n\
         Over the next {days} days this projects total spend of {total_spend:.2} and total revenue of {total_revenue:.2}.\n\
         \n\
         Give a three-point analysis:\n\
         1. Is the scenario realistic?\n\
         2. What risks come with scaling the budget this way?\n\
         3. What should be watched to keep ROAS on target?\n\
         \n\
         Answer in concise bullet points.",
        spend = scenario.average_daily_spend,
        roas = scenario.average_roas,
        budget = scenario.budget_growth_pct,
        roas_change = scenario.roas_change_pct,
        days = scenario.horizon_days,
        total_spend = scenario.total_spend,
        total_revenue = scenario.total_revenue,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, platform: Platform) -> CampaignSummary {
        CampaignSummary {
            name: name.to_string(),
            platform,
            spend: 100.0,
            roas: 2.0,
            cpa: 10.0,
            ctr: 1.0,
        }
    }

    #[test]
    fn test_campaign_prompt_embeds_data() {
        let prompt = campaign_analysis(&[CampaignSummary {
            name: "Summer Sale".to_string(),
            platform: Platform::Snapchat,
            spend: 500.0,
            roas: 5.0,
            cpa: 20.0,
            ctr: 2.5,
        }]);
        assert!(prompt.contains("\"name\": \"Summer Sale\""));
        assert!(prompt.contains("\"platform\": \"snapchat\""));
        assert!(prompt.contains("bullet points"));
    }

    #[test]
    fn test_campaign_prompt_lists_platform_labels() {
        let prompt = campaign_analysis(&[
            summary("Retargeting", Platform::Meta),
            summary("Search", Platform::Google),
            summary("Brand", Platform::Meta),
        ]);
        assert!(prompt.contains("Platforms: Google, Meta (FB/IG)\n"));

        let prompt = campaign_analysis(&[]);
        assert!(prompt.contains("Platforms: none\n"));
    }

    #[test]
    fn test_scenario_prompt_formats_numbers() {
        let prompt = scenario_analysis(&ScenarioSummary {
            average_daily_spend: 100.0,
            average_roas: 2.5,
            budget_growth_pct: 50.0,
            roas_change_pct: -10.0,
            horizon_days: 30,
            total_spend: 4500.0,
            total_revenue: 10125.0,
        });
        assert!(prompt.contains("average daily spend 100.00"));
        assert!(prompt.contains("average ROAS 2.50"));
        assert!(prompt.contains("change budget by +50%"));
        assert!(prompt.contains("change by -10%"));
        assert!(prompt.contains("next 30 days"));
        assert!(prompt.contains("total revenue of 10125.00"));
    }
}
