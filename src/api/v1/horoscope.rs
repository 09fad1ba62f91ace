//! Direct horoscope endpoint

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::identity::RequestIdentity;
use crate::domain::insight::Insight;

#[derive(Debug, Deserialize, Validate)]
pub struct HoroscopeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// `YYYY-MM-DD`
    pub birth_date: NaiveDate,
    pub birth_time: Option<String>,
    pub birth_place: Option<String>,
    /// Short language code; defaults to English
    pub language: Option<String>,
    /// Insight date; defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub zodiac: String,
    pub insight: String,
    pub language: String,
}

impl From<Insight> for InsightResponse {
    fn from(insight: Insight) -> Self {
        Self {
            zodiac: insight.zodiac,
            insight: insight.insight,
            language: insight.language,
        }
    }
}

/// POST /v1/horoscope
pub async fn get_horoscope(
    State(state): State<AppState>,
    Json(request): Json<HoroscopeRequest>,
) -> Result<Json<InsightResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(name = %request.name, "Horoscope requested");

    let mut identity = RequestIdentity::new(request.name, request.birth_date);
    if let Some(time) = request.birth_time {
        identity = identity.with_birth_time(time);
    }
    if let Some(place) = request.birth_place {
        identity = identity.with_birth_place(place);
    }

    let insight = state
        .horoscope
        .handle(&identity, request.language.as_deref(), request.date)
        .await?;

    Ok(Json(insight.into()))
}
