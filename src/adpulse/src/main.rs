//! AdPulse: campaign performance dashboard and spend forecasting engine.
//!
//! Serves the HTTP API by default; `report` and `forecast` run the same
//! pipelines once over a JSON snapshot and print the result.

use adpulse_api::ApiServer;
use adpulse_core::config::AppConfig;
use adpulse_core::RawRecord;
use adpulse_insights::{GeminiClient, InsightService, InsightTask};
use adpulse_reporting::{DashboardReport, DateRange, DateRangePreset, ForecastReport, ScenarioParams};
use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "adpulse")]
#[command(about = "Campaign performance dashboard and spend forecasting engine")]
#[command(version)]
struct Cli {
    /// Config file (TOML/YAML/JSON); environment variables still override it
    #[arg(long, global = true)]
    config: Option<String>,

    /// Node identifier (overrides config)
    #[arg(long, global = true, env = "ADPULSE__NODE_ID")]
    node_id: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve(ServeArgs),
    /// Print the dashboard report for a date range
    Report(ReportArgs),
    /// Print a spend/revenue forecast for a scenario
    Forecast(ForecastArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// HTTP port (overrides config)
    #[arg(long, env = "ADPULSE__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "ADPULSE__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Insight API key (overrides config)
    #[arg(long, env = "ADPULSE__INSIGHTS__API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// JSON array of daily records
    #[arg(long)]
    input: PathBuf,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long, requires = "end", conflicts_with = "preset")]
    start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,

    /// today, yesterday, last7, last30, this_month, last_month or year_to_date
    /// (camelCase names such as thisMonth also work)
    #[arg(long)]
    preset: Option<DateRangePreset>,
}

#[derive(Args, Debug)]
struct ForecastArgs {
    /// JSON array of daily records
    #[arg(long)]
    input: PathBuf,

    /// Days to project
    #[arg(long)]
    days: Option<u32>,

    /// Budget change in percent, e.g. 20 or -10
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    budget_growth: f64,

    /// Expected ROAS change in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    roas_change: f64,

    /// Trailing days used for the baseline (overrides config)
    #[arg(long)]
    window: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so report output on stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adpulse=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(config, args).await,
        Command::Report(args) => report(&config, args),
        Command::Forecast(args) => forecast(&config, args),
    }
}

async fn serve(mut config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(port) = args.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = args.metrics_port {
        config.metrics.port = port;
    }
    if let Some(key) = args.api_key {
        config.insights.api_key = key;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        model = %config.insights.model,
        insights_enabled = !config.insights.api_key.is_empty(),
        "Configuration loaded"
    );

    if config.insights.api_key.is_empty() {
        warn!("No insight API key configured, insight requests will return the fallback message");
    }

    let client = GeminiClient::new(&config.insights).context("building insight client")?;
    let insights = InsightTask::new(Arc::new(InsightService::new(Arc::new(client))));

    let api_server = ApiServer::new(config.clone(), insights);

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("AdPulse is ready to serve traffic");

    // Blocks until shutdown
    api_server.start_http().await?;

    Ok(())
}

fn report(config: &AppConfig, args: ReportArgs) -> anyhow::Result<()> {
    let records = read_records(&args.input)?;

    let range = match (args.preset, args.start, args.end) {
        (Some(preset), _, _) => preset.resolve(Utc::now().date_naive()),
        (None, Some(start), Some(end)) => DateRange::new(start, end),
        _ => bail!("either --preset or both --start and --end must be given"),
    };

    let report = DashboardReport::build(&records, range, &config.settings);
    print_json(&report)
}

fn forecast(config: &AppConfig, args: ForecastArgs) -> anyhow::Result<()> {
    let horizon = args.days.unwrap_or(config.forecast.default_horizon_days);
    if horizon == 0 || horizon > config.forecast.max_horizon_days {
        bail!(
            "--days must be between 1 and {}",
            config.forecast.max_horizon_days
        );
    }

    let records = read_records(&args.input)?;
    let params = ScenarioParams {
        horizon_days: horizon,
        budget_growth_pct: args.budget_growth,
        roas_change_pct: args.roas_change,
    };

    let report = ForecastReport::build(
        &records,
        params,
        args.window.unwrap_or(config.forecast.baseline_window_days),
        config.forecast.chart_history_days,
    );
    print_json(&report)
}

fn read_records(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<RawRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing records from {}", path.display()))?;

    for record in &records {
        record.validate()?;
    }

    info!(path = %path.display(), records = records.len(), "Records loaded");
    Ok(records)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
