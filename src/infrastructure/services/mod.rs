//! Composed services over the domain traits

pub mod horoscope_service;
pub mod insight_cache_service;
pub mod retrieval_service;
pub mod synthesis_service;
pub mod translation_service;

pub use horoscope_service::HoroscopeService;
pub use insight_cache_service::{CacheStats, InsightCacheService};
pub use retrieval_service::{RetrievalOptions, RetrievalService};
pub use synthesis_service::SynthesisService;
pub use translation_service::TranslationService;
