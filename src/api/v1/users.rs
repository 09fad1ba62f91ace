//! User profile endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::api::v1::horoscope::InsightResponse;
use crate::domain::user::{NewUser, User};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub birth_date: NaiveDate,
    pub birth_time: Option<String>,
    pub birth_place: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    pub zodiac: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            birth_date: user.birth_date,
            birth_time: user.birth_time,
            birth_place: user.birth_place,
            zodiac: user.zodiac.display_name().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UserHoroscopeParams {
    pub date: Option<NaiveDate>,
    pub language: Option<String>,
}

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(name = %request.name, "Creating user");

    let user = state
        .users
        .create(NewUser {
            name: request.name,
            birth_date: request.birth_date,
            birth_time: request.birth_time,
            birth_place: request.birth_place,
        })
        .await?;

    Ok(Json(user.into()))
}

/// GET /v1/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.list().await?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /v1/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", user_id)))?;

    Ok(Json(user.into()))
}

/// GET /v1/users/{user_id}/horoscope
pub async fn get_user_horoscope(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<UserHoroscopeParams>,
) -> Result<Json<InsightResponse>, ApiError> {
    debug!(user_id = %user_id, "User horoscope requested");

    let insight = state
        .horoscope
        .handle_for_user(user_id, params.language.as_deref(), params.date)
        .await?;

    Ok(Json(insight.into()))
}
