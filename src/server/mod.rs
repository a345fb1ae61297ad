//! HTTP surface
//!
//! # Endpoints
//!
//! - `GET /` - live market data for the configured or requested quote assets
//! - `GET /snapshot` - latest snapshot published by the poller
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /live` - liveness probe
//! - `GET /ready` - readiness probe, ready once a snapshot is published

use crate::cache::Published;
use crate::error::Error;
use crate::market::{MarketDataService, MarketQuery};
use crate::poller::MarketSnapshot;
use crate::telemetry::{render_snapshot, set_gauge, GaugeMetric};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state for the HTTP handlers
pub struct AppState {
    service: Arc<MarketDataService>,
    published: Arc<Published<MarketSnapshot>>,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        service: Arc<MarketDataService>,
        published: Arc<Published<MarketSnapshot>>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            service,
            published,
            metrics,
        }
    }
}

/// Build the router over `state`
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(market_data_handler))
        .route("/snapshot", get(snapshot_handler))
        .route("/metrics", get(metrics_handler))
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler))
        .with_state(state)
}

/// Serve until ctrl-c
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct MarketDataParams {
    volume_quote: Option<String>,
    trade_count_quote: Option<String>,
}

/// Error body returned for failed live computations
struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Upstream { .. } | Error::Decode { .. } => StatusCode::BAD_GATEWAY,
            Error::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
            Error::NoLiquidity { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn market_data_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MarketDataParams>,
) -> Result<Response, ApiError> {
    let defaults = state.service.default_query();
    let query = MarketQuery {
        volume_quote_asset: params
            .volume_quote
            .map(|q| q.to_uppercase())
            .unwrap_or(defaults.volume_quote_asset),
        trade_count_quote_asset: params
            .trade_count_quote
            .map(|q| q.to_uppercase())
            .unwrap_or(defaults.trade_count_quote_asset),
    };

    let data = state.service.market_data(&query).await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to compute market data");
        ApiError(e)
    })?;

    Ok(Json(data).into_response())
}

async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.published.latest() {
        Some(snapshot) => Json(snapshot.as_ref().clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "no snapshot published yet" })),
        )
            .into_response(),
    }
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    if let Some(age) = state.published.age() {
        set_gauge(GaugeMetric::SnapshotAge, age.as_secs_f64());
    }

    let mut body = match &state.metrics {
        Some(handle) => {
            handle.run_upkeep();
            handle.render()
        }
        None => String::new(),
    };
    body.push_str(&render_snapshot(state.published.latest().as_deref()));

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.published.is_fresh() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}
