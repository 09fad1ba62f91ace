//! Administrative endpoints

pub mod cache;
pub mod corpus;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache", delete(cache::clear_cache))
        .route("/cache/invalidate", post(cache::invalidate_entry))
        .route("/corpus", get(corpus::corpus_info))
        .route("/corpus/load", post(corpus::load_corpus))
}
