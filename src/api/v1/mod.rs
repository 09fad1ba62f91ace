//! Public v1 API endpoints

pub mod horoscope;
pub mod languages;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/horoscope", post(horoscope::get_horoscope))
        .route("/languages", get(languages::list_languages))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/horoscope", get(users::get_user_horoscope))
}
