//! Insight requests with graceful degradation and last-request-wins tracking.

use crate::client::InsightGenerator;
use crate::error::InsightError;
use crate::prompt;
use adpulse_reporting::{CampaignSummary, ScenarioSummary};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shown when the generator fails for any reason.
pub const INSIGHT_FALLBACK: &str = "Could not generate insights right now. Please try again later.";

/// Shown when the generator answers with no text.
pub const INSIGHT_EMPTY: &str = "No insights could be generated for this data.";

/// Wraps a generator so callers always get displayable text back.
pub struct InsightService {
    generator: Arc<dyn InsightGenerator>,
}

impl InsightService {
    pub fn new(generator: Arc<dyn InsightGenerator>) -> Self {
        Self { generator }
    }

    /// Never fails: errors map to [`INSIGHT_FALLBACK`] or [`INSIGHT_EMPTY`].
    pub async fn complete(&self, prompt: &str) -> String {
        metrics::counter!("insights.requests").increment(1);

        match self.generator.generate(prompt).await {
            Ok(text) if text.trim().is_empty() => INSIGHT_EMPTY.to_string(),
            Ok(text) => text,
            Err(InsightError::EmptyResponse) => INSIGHT_EMPTY.to_string(),
            Err(e) => {
                metrics::counter!("insights.failures").increment(1);
                warn!(generator = self.generator.name(), error = %e, "Insight generation failed");
                INSIGHT_FALLBACK.to_string()
            }
        }
    }

    pub async fn analyze_campaigns(&self, campaigns: &[CampaignSummary]) -> String {
        self.complete(&prompt::campaign_analysis(campaigns)).await
    }

    pub async fn analyze_scenario(&self, scenario: &ScenarioSummary) -> String {
        self.complete(&prompt::scenario_analysis(scenario)).await
    }
}

/// State of the most recent insight request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsightStatus {
    #[default]
    Idle,
    InFlight {
        generation: u64,
    },
    Ready {
        generation: u64,
        text: String,
    },
}

#[derive(Default)]
struct TaskState {
    generation: u64,
    status: InsightStatus,
}

/// Handle to a spawned request.
pub struct PendingInsight {
    pub generation: u64,
    handle: JoinHandle<()>,
}

impl PendingInsight {
    /// Wait until the request has finished and its result (if still current)
    /// has been stored.
    pub async fn finished(self) {
        if let Err(e) = self.handle.await {
            warn!(generation = self.generation, error = %e, "Insight task aborted");
        }
    }
}

/// Runs insight requests in the background. Only the result of the latest
/// request is ever stored; earlier responses that arrive late are dropped.
#[derive(Clone)]
pub struct InsightTask {
    service: Arc<InsightService>,
    state: Arc<Mutex<TaskState>>,
}

impl InsightTask {
    pub fn new(service: Arc<InsightService>) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(TaskState::default())),
        }
    }

    pub fn status(&self) -> InsightStatus {
        self.state.lock().status.clone()
    }

    pub fn request_campaigns(&self, campaigns: Vec<CampaignSummary>) -> PendingInsight {
        self.spawn(move |service| async move { service.analyze_campaigns(&campaigns).await })
    }

    pub fn request_scenario(&self, scenario: ScenarioSummary) -> PendingInsight {
        self.spawn(move |service| async move { service.analyze_scenario(&scenario).await })
    }

    /// Must be called from within a tokio runtime.
    fn request(&self, prompt: String) -> PendingInsight {
        self.spawn(move |service| async move { service.complete(&prompt).await })
    }

    fn spawn<F, Fut>(&self, run: F) -> PendingInsight
    where
        F: FnOnce(Arc<InsightService>) -> Fut,
        Fut: Future<Output = String> + Send + 'static,
    {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            let generation = state.generation;
            state.status = InsightStatus::InFlight { generation };
            generation
        };

        let work = run(Arc::clone(&self.service));
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            let text = work.await;
            let mut state = state.lock();
            if state.generation == generation {
                info!(generation, "Insight ready");
                state.status = InsightStatus::Ready { generation, text };
            } else {
                debug!(generation, current = state.generation, "Discarding superseded insight");
            }
        });

        PendingInsight { generation, handle }
    }
}
