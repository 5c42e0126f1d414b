use thiserror::Error;

pub type AdPulseResult<T> = Result<T, AdPulseError>;

#[derive(Error, Debug)]
pub enum AdPulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AdPulseError {
    fn from(e: config::ConfigError) -> Self {
        AdPulseError::Config(e.to_string())
    }
}
