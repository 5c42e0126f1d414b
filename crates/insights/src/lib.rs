//! Natural-language insight generation for campaign and forecast views.
//!
//! The engine never waits on this crate: requests are issued on demand,
//! tracked by [`InsightTask`], and any failure degrades to a fixed fallback
//! message.

pub mod client;
pub mod error;
pub mod prompt;
pub mod task;

pub use client::{GeminiClient, InsightGenerator};
pub use error::{InsightError, InsightResult};
pub use task::{InsightService, InsightStatus, InsightTask, PendingInsight, INSIGHT_EMPTY, INSIGHT_FALLBACK};
