//! API server: builds the router and starts the HTTP and metrics listeners.

use crate::rest::{self, AppState};
use adpulse_core::config::AppConfig;
use adpulse_insights::InsightTask;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Assemble every route and middleware over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Reports
        .route("/v1/dashboard", post(rest::handle_dashboard))
        .route("/v1/forecast", post(rest::handle_forecast))
        // Insights
        .route("/v1/insights", get(rest::insight_status))
        .route("/v1/insights/campaigns", post(rest::request_campaign_insights))
        .route("/v1/insights/forecast", post(rest::request_forecast_insights))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    insights: InsightTask,
}

impl ApiServer {
    pub fn new(config: AppConfig, insights: InsightTask) -> Self {
        Self { config, insights }
    }

    fn state(&self) -> AppState {
        AppState {
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
            forecast: Arc::new(self.config.forecast.clone()),
            settings: Arc::new(self.config.settings.clone()),
            insights: self.insights.clone(),
        }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
