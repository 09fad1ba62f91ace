//! Supported translation languages endpoint

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    /// Short code to backend language tag
    pub languages: BTreeMap<String, String>,
    pub default: String,
}

/// GET /v1/languages
pub async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: state.horoscope.supported_languages(),
        default: "en".to_string(),
    })
}
