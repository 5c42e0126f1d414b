use crate::settings::Settings;
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADPULSE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Defaults for the baseline and scenario forecaster.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Trailing days averaged into the baseline.
    #[serde(default = "default_baseline_window_days")]
    pub baseline_window_days: usize,
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u32,
    /// Upper bound accepted at the API boundary.
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: u32,
    /// Historical days shown in front of the forecast in chart output.
    #[serde(default = "default_chart_history_days")]
    pub chart_history_days: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_insights_base_url")]
    pub base_url: String,
    #[serde(default = "default_insights_model")]
    pub model: String,
    /// Empty disables outbound calls; requests resolve to the fallback text.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_insights_timeout_ms")]
    pub timeout_ms: u64,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_baseline_window_days() -> usize {
    30
}
fn default_horizon_days() -> u32 {
    30
}
fn default_max_horizon_days() -> u32 {
    365
}
fn default_chart_history_days() -> usize {
    30
}
fn default_insights_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_insights_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_insights_timeout_ms() -> u64 {
    20_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            baseline_window_days: default_baseline_window_days(),
            default_horizon_days: default_horizon_days(),
            max_horizon_days: default_max_horizon_days(),
            chart_history_days: default_chart_history_days(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            base_url: default_insights_base_url(),
            model: default_insights_model(),
            api_key: String::new(),
            timeout_ms: default_insights_timeout_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            forecast: ForecastConfig::default(),
            insights: InsightsConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder().add_source(environment()).build()?;
        config.try_deserialize()
    }

    /// Load from a TOML/YAML/JSON file, with environment variables layered on top.
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(environment());

        builder.build()?.try_deserialize()
    }
}

/// `ADPULSE__SECTION__KEY` variables. No field is a list, so values are
/// never split.
fn environment() -> config::Environment {
    config::Environment::with_prefix("ADPULSE")
        .separator("__")
        .try_parsing(true)
}
