pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use config::AppConfig;
pub use error::{AdPulseError, AdPulseResult};
pub use settings::Settings;
pub use types::{Counters, Platform, RawRecord};
