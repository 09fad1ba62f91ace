//! In-memory cache implementation using moka

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::Cache;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct StoredEntry {
    /// Serialized JSON value
    data: String,
    /// Expiration timestamp (millis since epoch, per the injected clock)
    expires_at: u64,
}

/// Thread-safe in-memory cache implementation using moka
///
/// Per-entry TTL is tracked against an injectable clock so expiry boundaries
/// can be tested deterministically; moka's capacity eviction handles sizing.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, StoredEntry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache driven by the given clock
    pub fn with_clock(config: InMemoryCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(config.max_capacity).build(),
            clock,
        }
    }

    fn is_expired(&self, entry: &StoredEntry) -> bool {
        self.clock.now_millis() > entry.expires_at
    }

    fn matches_pattern(pattern: &str, key: &str) -> Result<bool, DomainError> {
        let pattern_regex = format!("^{}$", regex::escape(pattern).replace("\\*", ".*"));
        let regex = regex::Regex::new(&pattern_regex)
            .map_err(|e| DomainError::cache(format!("Invalid pattern: {}", e)))?;
        Ok(regex.is_match(key))
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if self.is_expired(&entry) {
                    self.cache.remove(key).await;
                    Ok(None)
                } else {
                    Ok(Some(entry.data))
                }
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let entry = StoredEntry {
            data: value.to_string(),
            expires_at: self.clock.now_millis() + ttl.as_millis() as u64,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let existed = self.cache.get(key).await.is_some();
        self.cache.remove(key).await;
        Ok(existed)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let keys: Vec<String> = self
            .cache
            .iter()
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let mut deleted = 0usize;
        for key in keys {
            if Self::matches_pattern(pattern, &key)? {
                self.cache.remove(&key).await;
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                let now = self.clock.now_millis();
                if now > entry.expires_at {
                    Ok(None)
                } else {
                    Ok(Some(Duration::from_millis(entry.expires_at - now)))
                }
            }
            None => Ok(None),
        }
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}
