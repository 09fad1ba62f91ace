//! Application state for shared services

use std::sync::Arc;

use crate::domain::retrieval::VectorSearch;
use crate::domain::user::UserRepository;
use crate::infrastructure::services::HoroscopeService;

/// Shared handles injected into every request handler
#[derive(Clone)]
pub struct AppState {
    pub horoscope: Arc<HoroscopeService>,
    pub users: Arc<dyn UserRepository>,
    pub search: Arc<dyn VectorSearch>,
}

impl AppState {
    pub fn new(
        horoscope: Arc<HoroscopeService>,
        users: Arc<dyn UserRepository>,
        search: Arc<dyn VectorSearch>,
    ) -> Self {
        Self {
            horoscope,
            users,
            search,
        }
    }
}
