//! Prometheus metrics endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::error::{AppError, Result};
use crate::metrics;
use crate::server::AppState;

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    update_metrics_from_state(&state);

    let output = metrics::encode_metrics()
        .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        output,
    ))
}

/// Gauges are sampled from state at scrape time
fn update_metrics_from_state(state: &AppState) {
    metrics::REGISTERED_TAGS.set(state.registry.len() as i64);
    metrics::TEMPLATES_STORED.set(state.template_store.count() as i64);
}
