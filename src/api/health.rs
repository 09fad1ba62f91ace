//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /health — liveness, no dependencies touched
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready — verifies the search backend and cache
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = Vec::new();

    let search_healthy = state.search.health_check().await.unwrap_or(false);
    checks.push(HealthCheck {
        name: format!("search ({})", state.search.provider_type()),
        status: if search_healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        message: (!search_healthy).then(|| "backend unreachable".to_string()),
    });

    let cache_stats = state.horoscope.cache_stats().await;
    checks.push(HealthCheck {
        name: "cache".to_string(),
        status: if cache_stats.status == "error" {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        },
        message: Some(cache_stats.status),
    });

    // Only an unreachable search backend fails readiness; the cache degrades
    let status = if search_healthy {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };
    let code = if search_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
    };

    (code, Json(response))
}
