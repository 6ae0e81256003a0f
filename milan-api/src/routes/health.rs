use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use milan_shared::types::api::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

/// Liveness plus dependency checks. A lost broker only degrades the
/// service; an unreachable store makes it unavailable.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = vec![match state.store.ping() {
        Ok(()) => HealthCheck::healthy("store"),
        Err(e) => HealthCheck::unhealthy("store", e.to_string()),
    }];

    match state.events.is_connected() {
        Some(true) => checks.push(HealthCheck::healthy("rabbitmq")),
        Some(false) => checks.push(HealthCheck {
            name: "rabbitmq".into(),
            status: HealthStatus::Degraded,
            message: Some("channel closed, events are being dropped".into()),
        }),
        None => {}
    }

    let response = HealthResponse::healthy("milan-api", env!("CARGO_PKG_VERSION")).with_checks(checks);
    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(response))
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
