//! Best-effort response cache for generated insights

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheExt, FingerprintGenerator};
use crate::domain::identity::RequestIdentity;
use crate::domain::insight::{CachedInsight, Insight};

/// Snapshot of the cache state for the admin surface
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub status: String,
    pub entries: usize,
    pub ttl_minutes: u64,
}

/// Response cache keyed by identity fingerprints.
///
/// Every operation is best-effort: a failing or absent backend degrades to
/// cache-disabled behavior and is logged, never propagated. The pipeline must
/// keep producing insights when the cache store is down.
#[derive(Debug)]
pub struct InsightCacheService {
    cache: Option<Arc<dyn Cache>>,
    keys: FingerprintGenerator,
    ttl_minutes: u64,
}

impl InsightCacheService {
    pub fn new(cache: Arc<dyn Cache>, ttl_minutes: u64) -> Self {
        Self {
            cache: Some(cache),
            keys: FingerprintGenerator::new(),
            ttl_minutes,
        }
    }

    /// A no-op cache, used when no backend is configured or reachable
    pub fn disabled() -> Self {
        Self {
            cache: None,
            keys: FingerprintGenerator::new(),
            ttl_minutes: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }

    /// Looks up a cached insight for this identity
    pub async fn get(&self, identity: &RequestIdentity) -> Option<CachedInsight> {
        let cache = self.cache.as_ref()?;
        let key = self.keys.derive(identity);

        match cache.get::<CachedInsight>(&key).await {
            Ok(Some(cached)) => {
                debug!(key = %key, "Insight cache hit");
                Some(cached)
            }
            Ok(None) => {
                debug!(key = %key, "Insight cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Insight cache read failed, treating as miss");
                None
            }
        }
    }

    /// Stores an insight under this identity's fingerprint
    pub async fn put(&self, identity: &RequestIdentity, insight: &Insight) -> bool {
        let Some(cache) = self.cache.as_ref() else {
            return false;
        };

        let key = self.keys.derive(identity);
        let entry = CachedInsight::new(insight, self.ttl_minutes);

        match cache.set(&key, &entry, self.ttl()).await {
            Ok(()) => {
                debug!(key = %key, ttl_minutes = self.ttl_minutes, "Insight cached");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Insight cache write failed");
                false
            }
        }
    }

    /// Removes the entry for this identity. Idempotent: invalidating an
    /// absent key succeeds; `false` means the backend failed.
    pub async fn invalidate(&self, identity: &RequestIdentity) -> bool {
        let Some(cache) = self.cache.as_ref() else {
            return false;
        };

        let key = self.keys.derive(identity);
        match cache.delete(&key).await {
            Ok(_) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "Insight cache invalidation failed");
                false
            }
        }
    }

    /// Drops every entry in the insight namespace
    pub async fn clear_all(&self) -> bool {
        let Some(cache) = self.cache.as_ref() else {
            return false;
        };

        match cache.delete_pattern(&self.keys.namespace_pattern()).await {
            Ok(count) => {
                debug!(deleted = count, "Insight cache cleared");
                true
            }
            Err(e) => {
                warn!(error = %e, "Insight cache clear failed");
                false
            }
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let Some(cache) = self.cache.as_ref() else {
            return CacheStats {
                status: "disabled".to_string(),
                entries: 0,
                ttl_minutes: 0,
            };
        };

        match cache.size().await {
            Ok(entries) => CacheStats {
                status: "active".to_string(),
                entries,
                ttl_minutes: self.ttl_minutes,
            },
            Err(e) => {
                warn!(error = %e, "Insight cache stats failed");
                CacheStats {
                    status: "error".to_string(),
                    entries: 0,
                    ttl_minutes: self.ttl_minutes,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use chrono::NaiveDate;

    fn identity() -> RequestIdentity {
        RequestIdentity::new("Priya", NaiveDate::from_ymd_opt(1995, 8, 20).unwrap())
            .with_birth_time("06:30")
            .with_birth_place("Mumbai")
    }

    fn insight() -> Insight {
        Insight::new("Leo", "A bright day ahead.", "en")
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let service = InsightCacheService::new(Arc::new(MockCache::new()), 30);

        assert!(service.put(&identity(), &insight()).await);

        let cached = service.get(&identity()).await.unwrap();
        assert_eq!(cached.ttl_minutes, 30);
        assert_eq!(cached.into_insight(), insight());
    }

    #[tokio::test]
    async fn test_get_miss_returns_none() {
        let service = InsightCacheService::new(Arc::new(MockCache::new()), 30);
        assert!(service.get(&identity()).await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_is_inert() {
        let service = InsightCacheService::disabled();

        assert!(!service.is_enabled());
        assert!(!service.put(&identity(), &insight()).await);
        assert!(service.get(&identity()).await.is_none());
        assert_eq!(service.stats().await.status, "disabled");
    }

    #[tokio::test]
    async fn test_backend_error_degrades_to_miss() {
        let service =
            InsightCacheService::new(Arc::new(MockCache::new().with_error("redis down")), 30);

        assert!(service.get(&identity()).await.is_none());
        assert!(!service.put(&identity(), &insight()).await);
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let service = InsightCacheService::new(Arc::new(MockCache::new()), 30);
        service.put(&identity(), &insight()).await;

        assert!(service.invalidate(&identity()).await);
        assert!(service.invalidate(&identity()).await);
        assert!(service.get(&identity()).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_absent_key_succeeds() {
        let service = InsightCacheService::new(Arc::new(MockCache::new()), 30);
        assert!(service.invalidate(&identity()).await);
    }

    #[tokio::test]
    async fn test_invalidate_backend_failure_reports_false() {
        let service =
            InsightCacheService::new(Arc::new(MockCache::new().with_error("redis down")), 30);
        assert!(!service.invalidate(&identity()).await);
    }

    #[tokio::test]
    async fn test_clear_all_scoped_to_namespace() {
        let backend = Arc::new(MockCache::new());
        backend
            .set("other:key", &"unrelated", Duration::from_secs(60))
            .await
            .unwrap();

        let service = InsightCacheService::new(backend.clone(), 30);
        service.put(&identity(), &insight()).await;

        assert!(service.clear_all().await);
        assert!(service.get(&identity()).await.is_none());
        assert_eq!(backend.size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stats_reports_entries() {
        let service = InsightCacheService::new(Arc::new(MockCache::new()), 30);
        service.put(&identity(), &insight()).await;

        let stats = service.stats().await;
        assert_eq!(stats.status, "active");
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.ttl_minutes, 30);
    }
}
