use thiserror::Error;

pub type InsightResult<T> = Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("insight service not configured: {0}")]
    NotConfigured(String),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("insight API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("insight response contained no text")]
    EmptyResponse,

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
