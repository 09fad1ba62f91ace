//! Astro Insight Gateway
//!
//! Personalized horoscope insights built from:
//! - deterministic zodiac classification,
//! - semantic retrieval over a horoscope corpus,
//! - LLM synthesis with a deterministic fallback,
//! - optional Indic-language translation,
//! - a fingerprint-keyed, TTL-bounded response cache.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use api::state::AppState;
use config::RetrievalConfig;
use domain::almanac::AlmanacProvider;
use domain::cache::Cache;
use domain::retrieval::{CorpusDocument, Topic, VectorSearch};
use domain::translation::Translator;
use domain::user::InMemoryUserRepository;
use domain::zodiac::ZodiacSign;
use infrastructure::almanac::HttpAlmanac;
use infrastructure::cache::{InMemoryCache, InMemoryCacheConfig, RedisCache, RedisCacheConfig};
use infrastructure::generation::{GeminiConfig, GeminiGenerator};
use infrastructure::retrieval::{ChromaSearch, InMemorySearch};
use infrastructure::services::{
    HoroscopeService, InsightCacheService, RetrievalOptions, RetrievalService, SynthesisService,
    TranslationService,
};
use infrastructure::translation::HttpTranslator;

/// Create the application state with all collaborators wired from config
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = build_cache(config).await;
    let search = build_search(config);
    seed_corpus(&config.retrieval, search.as_ref()).await;
    let translator = build_translator(config);
    let almanac = build_almanac(config);

    let generator = Arc::new(GeminiGenerator::new(
        GeminiConfig::new(config.generation.api_key.clone())
            .with_model(config.generation.model.clone())
            .with_base_url(config.generation.base_url.clone())
            .with_request_timeout(Duration::from_secs(config.generation.timeout_secs)),
    ));

    let users = Arc::new(InMemoryUserRepository::new());

    let horoscope = HoroscopeService::new(
        match cache {
            Some(cache) => InsightCacheService::new(cache, config.cache.ttl_minutes),
            None => InsightCacheService::disabled(),
        },
        RetrievalService::new(
            search.clone(),
            RetrievalOptions {
                per_topic_limit: config.retrieval.per_topic_limit,
                filter_by_topic: config.retrieval.filter_by_topic,
                query_timeout: Duration::from_secs(config.retrieval.timeout_secs),
            },
        ),
        SynthesisService::new(generator, Duration::from_secs(config.generation.timeout_secs)),
        TranslationService::new(
            translator,
            Duration::from_secs(config.translation.timeout_secs),
        ),
        almanac,
        users.clone(),
    );

    Ok(AppState::new(Arc::new(horoscope), users, search))
}

async fn build_cache(config: &AppConfig) -> Option<Arc<dyn Cache>> {
    match config.cache.backend.as_str() {
        "redis" => {
            let redis_config = RedisCacheConfig::new(config.cache.redis_url.clone());
            match RedisCache::new(redis_config).await {
                Ok(cache) => {
                    info!("Using Redis response cache");
                    Some(Arc::new(cache))
                }
                Err(e) => {
                    warn!(error = %e, "Redis unreachable, running with cache disabled");
                    None
                }
            }
        }
        "memory" => {
            info!("Using in-memory response cache");
            Some(Arc::new(InMemoryCache::with_config(
                InMemoryCacheConfig::default().with_max_capacity(config.cache.max_capacity),
            )))
        }
        other => {
            warn!(backend = other, "Unknown cache backend, running with cache disabled");
            None
        }
    }
}

fn build_search(config: &AppConfig) -> Arc<dyn VectorSearch> {
    match config.retrieval.backend.as_str() {
        "chroma" => {
            info!(base_url = %config.retrieval.base_url, "Using Chroma search backend");
            Arc::new(
                ChromaSearch::with_base_url(
                    config.retrieval.base_url.clone(),
                    config.retrieval.collection.clone(),
                )
                .with_request_timeout(Duration::from_secs(config.retrieval.timeout_secs)),
            )
        }
        _ => {
            info!("Using in-memory search backend");
            Arc::new(InMemorySearch::new())
        }
    }
}

fn build_translator(config: &AppConfig) -> Option<Arc<dyn Translator>> {
    if config.translation.base_url.is_empty() {
        info!("No translation service configured, serving English only");
        return None;
    }

    Some(Arc::new(
        HttpTranslator::new(config.translation.base_url.clone())
            .with_request_timeout(Duration::from_secs(config.translation.timeout_secs)),
    ))
}

fn build_almanac(config: &AppConfig) -> Option<Arc<dyn AlmanacProvider>> {
    if config.almanac.api_url.is_empty() {
        return None;
    }

    Some(Arc::new(HttpAlmanac::new(
        config.almanac.api_url.clone(),
        Some(config.almanac.api_key.clone()),
    )))
}

/// Populates an empty search backend at startup, from the configured corpus
/// file or the built-in seed set. Best-effort: a failed load leaves the
/// backend empty and the pipeline falls back to synthesis without evidence.
async fn seed_corpus(config: &RetrievalConfig, search: &dyn VectorSearch) {
    let existing = match search.count().await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Corpus count failed, skipping startup load");
            return;
        }
    };

    if existing > 0 {
        info!(documents = existing, "Corpus already populated");
        return;
    }

    let documents = if config.corpus_path.is_empty() {
        default_corpus()
    } else {
        match load_corpus_file(&config.corpus_path) {
            Ok(documents) => documents,
            Err(e) => {
                warn!(
                    path = %config.corpus_path,
                    error = %e,
                    "Corpus file unreadable, using built-in seed set"
                );
                default_corpus()
            }
        }
    };

    match search.add_documents(documents).await {
        Ok(added) => info!(documents = added, "Corpus loaded at startup"),
        Err(e) => warn!(error = %e, "Corpus load failed, search backend starts empty"),
    }
}

fn load_corpus_file(path: &str) -> anyhow::Result<Vec<CorpusDocument>> {
    let raw = std::fs::read_to_string(path)?;
    let documents: Vec<CorpusDocument> = serde_json::from_str(&raw)?;
    Ok(documents)
}

/// One built-in horoscope per sign and topic, used when no corpus file is
/// configured so a fresh install serves real retrieval results immediately.
fn default_corpus() -> Vec<CorpusDocument> {
    const TOPIC_TEXTS: [(Topic, &str); 5] = [
        (
            Topic::General,
            "A steady rhythm carries the day and small consistent efforts pay off.",
        ),
        (
            Topic::Love,
            "An honest conversation deepens a bond you have been quietly tending.",
        ),
        (
            Topic::Career,
            "A colleague's offhand remark points at the opening you have been waiting for.",
        ),
        (
            Topic::Health,
            "Energy returns in the afternoon; favor rest over pushing through the morning.",
        ),
        (
            Topic::Money,
            "Hold off on impulse purchases; a planned expense lands better this week.",
        ),
    ];

    ZodiacSign::ALL
        .iter()
        .flat_map(|sign| {
            TOPIC_TEXTS.iter().map(|(topic, text)| CorpusDocument {
                id: format!("seed_{}_{}", sign.as_str(), topic.as_str()),
                sign: sign.as_str().to_string(),
                topic: topic.as_str().to_string(),
                date_tag: "seed".to_string(),
                text: format!("{}: {}", sign.display_name(), text),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus_covers_every_sign_and_topic() {
        let documents = default_corpus();
        assert_eq!(documents.len(), ZodiacSign::ALL.len() * Topic::ALL.len());

        let leo_love = documents
            .iter()
            .find(|d| d.sign == "leo" && d.topic == "love")
            .unwrap();
        assert!(leo_love.text.starts_with("Leo: "));
    }

    #[tokio::test]
    async fn test_startup_seeds_empty_memory_backend() {
        let state = create_app_state(&AppConfig::default()).await.unwrap();

        let count = state.search.count().await.unwrap();
        assert_eq!(count, ZodiacSign::ALL.len() * Topic::ALL.len());
    }

    #[tokio::test]
    async fn test_startup_skips_populated_backend() {
        let search = InMemorySearch::new();
        search
            .add_documents(vec![CorpusDocument {
                id: "existing".to_string(),
                sign: "leo".to_string(),
                topic: "general".to_string(),
                date_tag: "20240101".to_string(),
                text: "Already here.".to_string(),
            }])
            .await
            .unwrap();

        seed_corpus(&RetrievalConfig::default(), &search).await;

        assert_eq!(search.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_corpus_file_falls_back_to_seed_set() {
        let search = InMemorySearch::new();
        let config = RetrievalConfig {
            corpus_path: "/nonexistent/corpus.json".to_string(),
            ..RetrievalConfig::default()
        };

        seed_corpus(&config, &search).await;

        assert_eq!(
            search.count().await.unwrap(),
            ZodiacSign::ALL.len() * Topic::ALL.len()
        );
    }
}
