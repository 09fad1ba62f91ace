//! Application configuration

pub mod app_config;

pub use app_config::{
    AlmanacConfig, AppConfig, CacheConfig, GenerationConfig, LogFormat, LoggingConfig,
    RetrievalConfig, ServerConfig, TranslationConfig,
};
