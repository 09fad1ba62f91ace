//! Cache administration endpoints

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::identity::RequestIdentity;
use crate::infrastructure::services::CacheStats;

#[derive(Debug, Serialize)]
pub struct CacheActionResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    pub name: String,
    pub birth_date: NaiveDate,
    pub birth_time: Option<String>,
    pub birth_place: Option<String>,
}

/// GET /admin/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.horoscope.cache_stats().await)
}

/// DELETE /admin/cache
pub async fn clear_cache(State(state): State<AppState>) -> Json<CacheActionResponse> {
    info!("Clearing insight cache");
    let success = state.horoscope.clear_cache().await;

    Json(CacheActionResponse { success })
}

/// POST /admin/cache/invalidate
pub async fn invalidate_entry(
    State(state): State<AppState>,
    Json(request): Json<InvalidateRequest>,
) -> Result<Json<CacheActionResponse>, ApiError> {
    let identity = RequestIdentity {
        name: request.name,
        birth_date: request.birth_date,
        birth_time: request.birth_time,
        birth_place: request.birth_place,
    };
    identity.validate()?;

    let success = state.horoscope.invalidate(&identity).await;
    Ok(Json(CacheActionResponse { success }))
}
