//! Insight orchestration pipeline

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::almanac::{AlmanacProvider, DailyContext};
use crate::domain::identity::RequestIdentity;
use crate::domain::insight::Insight;
use crate::domain::user::UserRepository;
use crate::domain::zodiac::ZodiacSign;
use crate::domain::DomainError;

use super::insight_cache_service::{CacheStats, InsightCacheService};
use super::retrieval_service::RetrievalService;
use super::synthesis_service::SynthesisService;
use super::translation_service::TranslationService;

const ALMANAC_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates one insight request end to end:
/// cache check, classification, retrieval, synthesis, translation, cache write.
///
/// A cache hit short-circuits the whole pipeline. Only invalid input and a
/// wholly unavailable search backend are fatal; every other collaborator
/// failure degrades the result instead of aborting it.
#[derive(Debug)]
pub struct HoroscopeService {
    cache: InsightCacheService,
    retrieval: RetrievalService,
    synthesis: SynthesisService,
    translation: TranslationService,
    almanac: Option<Arc<dyn AlmanacProvider>>,
    almanac_timeout: Duration,
    users: Arc<dyn UserRepository>,
}

impl HoroscopeService {
    pub fn new(
        cache: InsightCacheService,
        retrieval: RetrievalService,
        synthesis: SynthesisService,
        translation: TranslationService,
        almanac: Option<Arc<dyn AlmanacProvider>>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            cache,
            retrieval,
            synthesis,
            translation,
            almanac,
            almanac_timeout: ALMANAC_TIMEOUT,
            users,
        }
    }

    pub fn with_almanac_timeout(mut self, almanac_timeout: Duration) -> Self {
        self.almanac_timeout = almanac_timeout;
        self
    }

    pub fn supported_languages(&self) -> std::collections::BTreeMap<String, String> {
        self.translation.supported_languages()
    }

    async fn fetch_daily_context(&self, as_of: NaiveDate) -> Option<DailyContext> {
        let almanac = self.almanac.as_ref()?;
        if !almanac.is_available() {
            return None;
        }

        match timeout(self.almanac_timeout, almanac.daily_context(as_of)).await {
            Ok(Ok(context)) => context,
            Ok(Err(e)) => {
                warn!(error = %e, "Almanac lookup failed, continuing without context");
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.almanac_timeout.as_secs(),
                    "Almanac lookup timed out, continuing without context"
                );
                None
            }
        }
    }

    /// Runs the pipeline for one identity
    pub async fn handle(
        &self,
        identity: &RequestIdentity,
        requested_language: Option<&str>,
        as_of: Option<NaiveDate>,
    ) -> Result<Insight, DomainError> {
        identity.validate()?;

        if let Some(cached) = self.cache.get(identity).await {
            info!(stage = "cache_check", outcome = "hit", "Serving cached insight");
            return Ok(cached.into_insight());
        }
        info!(stage = "cache_check", outcome = "miss", "Generating fresh insight");

        let sign = ZodiacSign::from_birth_date(identity.birth_date);
        info!(stage = "classify", sign = sign.as_str(), "Classified birth date");

        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
        let context = self.fetch_daily_context(as_of).await;

        let items = self.retrieval.aggregate(sign, as_of, context.as_ref()).await?;
        info!(stage = "retrieve", items = items.len(), "Evidence retrieved");

        let text = self
            .synthesis
            .compose_and_generate(&identity.name, sign, &items, context.as_ref())
            .await;
        info!(stage = "synthesize", chars = text.len(), "Insight synthesized");

        let insight = Insight::new(sign.display_name(), text, "en");
        let insight = self
            .translation
            .maybe_translate(insight, requested_language)
            .await;
        info!(stage = "translate", language = %insight.language, "Language gate applied");

        let stored = self.cache.put(identity, &insight).await;
        info!(stage = "cache_write", stored, "Pipeline complete");

        Ok(insight)
    }

    /// Resolves a stored user and runs the pipeline for their identity
    pub async fn handle_for_user(
        &self,
        user_id: Uuid,
        requested_language: Option<&str>,
        as_of: Option<NaiveDate>,
    ) -> Result<Insight, DomainError> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user_id)))?;

        self.handle(&user.identity(), requested_language, as_of).await
    }

    pub async fn invalidate(&self, identity: &RequestIdentity) -> bool {
        self.cache.invalidate(identity).await
    }

    pub async fn clear_cache(&self) -> bool {
        self.cache.clear_all().await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::almanac::mock::MockAlmanac;
    use crate::domain::cache::MockCache;
    use crate::domain::generation::mock::MockGenerator;
    use crate::domain::retrieval::{MockVectorSearch, RetrievedItem, Topic};
    use crate::domain::translation::mock::MockTranslator;
    use crate::domain::user::{InMemoryUserRepository, NewUser};
    use crate::infrastructure::services::retrieval_service::RetrievalOptions;

    struct Fixture {
        search: Arc<MockVectorSearch>,
        generator: Arc<MockGenerator>,
        translator: Arc<MockTranslator>,
        users: Arc<InMemoryUserRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                search: Arc::new(
                    MockVectorSearch::new()
                        .with_topic_results(
                            Topic::General,
                            vec![
                                RetrievedItem::new("g1", "general", "a calm day", 0.1),
                                RetrievedItem::new("g2", "general", "steady energy", 0.2),
                            ],
                        )
                        .with_topic_results(
                            Topic::Love,
                            vec![RetrievedItem::new("l1", "love", "romance calls", 0.15)],
                        ),
                ),
                generator: Arc::new(MockGenerator::new().with_response(
                    "Priya, today your Leo warmth draws people in; follow it.",
                )),
                translator: Arc::new(MockTranslator::new()),
                users: Arc::new(InMemoryUserRepository::new()),
            }
        }

        fn with_search(mut self, search: MockVectorSearch) -> Self {
            self.search = Arc::new(search);
            self
        }

        fn with_generator(mut self, generator: MockGenerator) -> Self {
            self.generator = Arc::new(generator);
            self
        }

        fn build(&self) -> HoroscopeService {
            HoroscopeService::new(
                InsightCacheService::new(Arc::new(MockCache::new()), 30),
                RetrievalService::new(
                    self.search.clone(),
                    RetrievalOptions {
                        filter_by_topic: true,
                        ..RetrievalOptions::default()
                    },
                ),
                SynthesisService::new(self.generator.clone(), Duration::from_secs(5)),
                TranslationService::new(Some(self.translator.clone()), Duration::from_secs(5)),
                None,
                self.users.clone(),
            )
        }

        fn build_without_translator(&self) -> HoroscopeService {
            HoroscopeService::new(
                InsightCacheService::new(Arc::new(MockCache::new()), 30),
                RetrievalService::new(
                    self.search.clone(),
                    RetrievalOptions {
                        filter_by_topic: true,
                        ..RetrievalOptions::default()
                    },
                ),
                SynthesisService::new(self.generator.clone(), Duration::from_secs(5)),
                TranslationService::new(None, Duration::from_secs(5)),
                None,
                self.users.clone(),
            )
        }

        fn build_with_almanac(&self, almanac: MockAlmanac) -> HoroscopeService {
            HoroscopeService::new(
                InsightCacheService::new(Arc::new(MockCache::new()), 30),
                RetrievalService::new(
                    self.search.clone(),
                    RetrievalOptions {
                        filter_by_topic: true,
                        ..RetrievalOptions::default()
                    },
                ),
                SynthesisService::new(self.generator.clone(), Duration::from_secs(5)),
                TranslationService::new(Some(self.translator.clone()), Duration::from_secs(5)),
                Some(Arc::new(almanac)),
                self.users.clone(),
            )
        }
    }

    fn priya() -> RequestIdentity {
        RequestIdentity::new("Priya", NaiveDate::from_ymd_opt(1995, 8, 15).unwrap())
            .with_birth_time("06:30")
            .with_birth_place("Mumbai")
    }

    fn as_of() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, 15)
    }

    #[tokio::test]
    async fn test_fresh_request_runs_full_pipeline() {
        let fixture = Fixture::new();
        let service = fixture.build();

        let insight = service.handle(&priya(), None, as_of()).await.unwrap();

        assert_eq!(insight.zodiac, "Leo");
        assert_eq!(insight.language, "en");
        assert!(insight.insight.contains("Priya"));
        assert_eq!(fixture.search.query_count(), Topic::ALL.len());
        assert_eq!(fixture.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache_with_zero_collaborator_calls() {
        let fixture = Fixture::new();
        let service = fixture.build();

        let first = service.handle(&priya(), None, as_of()).await.unwrap();

        let queries_after_first = fixture.search.query_count();
        let generations_after_first = fixture.generator.call_count();

        let second = service.handle(&priya(), None, as_of()).await.unwrap();

        assert_eq!(second, first);
        assert_eq!(fixture.search.query_count(), queries_after_first);
        assert_eq!(fixture.generator.call_count(), generations_after_first);
    }

    #[tokio::test]
    async fn test_validation_failure_is_fatal_and_runs_nothing() {
        let fixture = Fixture::new();
        let service = fixture.build();

        let invalid = RequestIdentity::new("  ", NaiveDate::from_ymd_opt(1995, 8, 15).unwrap());
        let result = service.handle(&invalid, None, as_of()).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(fixture.search.query_count(), 0);
    }

    #[tokio::test]
    async fn test_total_retrieval_outage_is_fatal() {
        let fixture = Fixture::new().with_search(MockVectorSearch::new().with_total_outage());
        let service = fixture.build();

        let result = service.handle(&priya(), None, as_of()).await;
        assert!(matches!(result, Err(DomainError::Retrieval { .. })));
    }

    #[tokio::test]
    async fn test_partial_retrieval_failure_still_produces_insight() {
        let fixture = Fixture::new().with_search(
            MockVectorSearch::new()
                .with_failing_topic(Topic::Career)
                .with_topic_results(
                    Topic::Love,
                    vec![RetrievedItem::new("l1", "love", "romance calls", 0.1)],
                ),
        );
        let service = fixture.build();

        let insight = service.handle(&priya(), None, as_of()).await.unwrap();
        assert!(!insight.insight.is_empty());
    }

    #[tokio::test]
    async fn test_failing_generator_degrades_to_fallback() {
        let fixture = Fixture::new().with_generator(MockGenerator::new().with_error("down"));
        let service = fixture.build();

        let insight = service.handle(&priya(), None, as_of()).await.unwrap();

        assert!(insight.insight.contains("Priya"));
        assert!(insight.insight.contains("Leo"));
    }

    #[tokio::test]
    async fn test_translation_request_is_honored() {
        let fixture = Fixture::new();
        let service = fixture.build();

        let insight = service.handle(&priya(), Some("hi"), as_of()).await.unwrap();

        assert_eq!(insight.language, "hi");
        assert!(insight.insight.starts_with("[hi] "));
        assert_eq!(fixture.translator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_translator_downgrades_silently() {
        let fixture = Fixture::new();
        let service = fixture.build_without_translator();

        let insight = service.handle(&priya(), Some("hi"), as_of()).await.unwrap();

        assert_eq!(insight.language, "en");
        assert!(!insight.insight.is_empty());
    }

    #[tokio::test]
    async fn test_slow_almanac_does_not_stall_pipeline() {
        let fixture = Fixture::new();
        let context = DailyContext {
            nakshatra: Some("rohini".to_string()),
            ..DailyContext::default()
        };
        let service = fixture
            .build_with_almanac(
                MockAlmanac::with_context(context).with_delay(Duration::from_millis(250)),
            )
            .with_almanac_timeout(Duration::from_millis(10));

        let insight = service.handle(&priya(), None, as_of()).await.unwrap();

        assert_eq!(insight.zodiac, "Leo");
        assert!(!insight.insight.is_empty());
    }

    #[tokio::test]
    async fn test_handle_for_user_resolves_stored_identity() {
        let fixture = Fixture::new();
        let service = fixture.build();

        let user = fixture
            .users
            .create(NewUser {
                name: "Priya".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1995, 8, 15).unwrap(),
                birth_time: Some("06:30".to_string()),
                birth_place: Some("Mumbai".to_string()),
            })
            .await
            .unwrap();

        let insight = service
            .handle_for_user(user.id, None, as_of())
            .await
            .unwrap();

        assert_eq!(insight.zodiac, "Leo");
    }

    #[tokio::test]
    async fn test_handle_for_unknown_user_is_not_found() {
        let fixture = Fixture::new();
        let service = fixture.build();

        let result = service.handle_for_user(Uuid::new_v4(), None, as_of()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalidate_forces_regeneration() {
        let fixture = Fixture::new();
        let service = fixture.build();

        service.handle(&priya(), None, as_of()).await.unwrap();
        assert!(service.invalidate(&priya()).await);

        service.handle(&priya(), None, as_of()).await.unwrap();
        assert_eq!(fixture.generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_stats_after_write() {
        let fixture = Fixture::new();
        let service = fixture.build();

        service.handle(&priya(), None, as_of()).await.unwrap();

        let stats = service.cache_stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.status, "active");
    }
}
