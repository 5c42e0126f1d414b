//! REST API handlers for the dashboard, forecast and insight endpoints, plus
//! operational probes.

use adpulse_core::config::ForecastConfig;
use adpulse_core::{RawRecord, Settings};
use adpulse_insights::{InsightStatus, InsightTask};
use adpulse_reporting::{DashboardReport, DateRange, DateRangePreset, ForecastReport, ScenarioParams};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Maximum number of records accepted in one snapshot.
const MAX_RECORDS: usize = 100_000;

/// Maximum campaign name length.
const MAX_NAME_LEN: usize = 256;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub node_id: String,
    pub start_time: Instant,
    pub forecast: Arc<ForecastConfig>,
    pub settings: Arc<Settings>,
    pub insights: InsightTask,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: &str, message: impl Into<String>) -> ApiError {
    let message = message.into();
    warn!(error, message = %message, "Request validation failed");
    metrics::counter!("api.validation_errors").increment(1);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

/// JSON body extractor whose rejections use the [`ErrorResponse`] shape.
/// Unparseable dates and unknown platforms surface as `invalid_body`.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(body_rejection(rejection)),
        }
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    bad_request("invalid_body", rejection.body_text())
}

/// Validate a record snapshot at the API boundary.
fn validate_records(records: &[RawRecord]) -> Result<(), String> {
    if records.len() > MAX_RECORDS {
        return Err("snapshot exceeds maximum number of records".to_string());
    }
    for record in records {
        if record.campaign_name.len() > MAX_NAME_LEN {
            return Err(format!("record '{}' campaign name exceeds maximum length", record.id));
        }
        record.validate().map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub preset: Option<DateRangePreset>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl DashboardRequest {
    /// A preset wins over explicit dates; otherwise both dates are required.
    fn resolve_range(&self, today: NaiveDate) -> Result<DateRange, &'static str> {
        match (self.preset, self.start, self.end) {
            (Some(preset), _, _) => Ok(preset.resolve(today)),
            (None, Some(start), Some(end)) => Ok(DateRange::new(start, end)),
            _ => Err("either 'preset' or both 'start' and 'end' must be given"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub records: Vec<RawRecord>,
    #[serde(alias = "forecast_days")]
    pub forecast_days: u32,
    #[serde(default, alias = "budget_growth_pct")]
    pub budget_growth_pct: f64,
    #[serde(default, alias = "roas_change_pct")]
    pub roas_change_pct: f64,
    #[serde(default, alias = "window_days")]
    pub window_days: Option<usize>,
}

fn validate_forecast_request(request: &ForecastRequest, config: &ForecastConfig) -> Result<(), String> {
    if request.forecast_days == 0 {
        return Err("'forecastDays' must be at least 1".to_string());
    }
    if request.forecast_days > config.max_horizon_days {
        return Err(format!(
            "'forecastDays' must not exceed {}",
            config.max_horizon_days
        ));
    }
    if !request.budget_growth_pct.is_finite() || !request.roas_change_pct.is_finite() {
        return Err("scenario percentages must be finite".to_string());
    }
    if request.window_days == Some(0) {
        return Err("'windowDays' must be at least 1".to_string());
    }
    validate_records(&request.records)
}

fn build_forecast(request: &ForecastRequest, config: &ForecastConfig) -> ForecastReport {
    let params = ScenarioParams {
        horizon_days: request.forecast_days,
        budget_growth_pct: request.budget_growth_pct,
        roas_change_pct: request.roas_change_pct,
    };
    ForecastReport::build(
        &request.records,
        params,
        request.window_days.unwrap_or(config.baseline_window_days),
        config.chart_history_days,
    )
}

fn build_dashboard(state: &AppState, request: &DashboardRequest) -> Result<DashboardReport, ApiError> {
    let range = request
        .resolve_range(Utc::now().date_naive())
        .map_err(|msg| bad_request("invalid_date_range", msg))?;
    validate_records(&request.records).map_err(|msg| bad_request("invalid_records", msg))?;

    let settings = request.settings.as_ref().unwrap_or(state.settings.as_ref());
    Ok(DashboardReport::build(&request.records, range, settings))
}

/// POST /v1/dashboard — Campaign table, totals, funnel and alerts for a range.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DashboardRequest>,
) -> Result<Json<DashboardReport>, ApiError> {
    metrics::counter!("api.requests", "endpoint" => "dashboard").increment(1);
    build_dashboard(&state, &request).map(Json)
}

/// POST /v1/forecast — Scenario projection over the full history.
pub async fn handle_forecast(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ForecastRequest>,
) -> Result<Json<ForecastReport>, ApiError> {
    metrics::counter!("api.requests", "endpoint" => "forecast").increment(1);

    validate_forecast_request(&request, &state.forecast)
        .map_err(|msg| bad_request("invalid_forecast_request", msg))?;

    Ok(Json(build_forecast(&request, &state.forecast)))
}

/// POST /v1/insights/campaigns — Start a campaign analysis for a range.
pub async fn request_campaign_insights(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DashboardRequest>,
) -> Result<(StatusCode, Json<InsightAccepted>), ApiError> {
    metrics::counter!("api.requests", "endpoint" => "insights_campaigns").increment(1);

    let report = build_dashboard(&state, &request)?;
    let pending = state.insights.request_campaigns(report.insight_summary());
    info!(generation = pending.generation, campaigns = report.campaigns.len(), "Campaign insight requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(InsightAccepted {
            generation: pending.generation,
        }),
    ))
}

/// POST /v1/insights/forecast — Start a scenario analysis.
pub async fn request_forecast_insights(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ForecastRequest>,
) -> Result<(StatusCode, Json<InsightAccepted>), ApiError> {
    metrics::counter!("api.requests", "endpoint" => "insights_forecast").increment(1);

    validate_forecast_request(&request, &state.forecast)
        .map_err(|msg| bad_request("invalid_forecast_request", msg))?;

    let report = build_forecast(&request, &state.forecast);
    let pending = state.insights.request_scenario(report.scenario_summary());
    info!(generation = pending.generation, horizon = request.forecast_days, "Scenario insight requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(InsightAccepted {
            generation: pending.generation,
        }),
    ))
}

/// GET /v1/insights — Status of the most recent insight request.
pub async fn insight_status(State(state): State<AppState>) -> Json<InsightStatus> {
    Json(state.insights.status())
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe for Kubernetes.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live — Liveness probe for Kubernetes.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightAccepted {
    pub generation: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}
