//! The insight deliverable and its cached form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final result of one orchestration call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Capitalized sign name, e.g. "Leo"
    pub zodiac: String,
    /// The synthesized (and possibly translated) insight text
    pub insight: String,
    /// Short language code of the insight text
    pub language: String,
}

impl Insight {
    pub fn new(
        zodiac: impl Into<String>,
        insight: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            zodiac: zodiac.into(),
            insight: insight.into(),
            language: language.into(),
        }
    }
}

/// Cache entry wrapping an insight with its write metadata.
///
/// The only entity with a lifetime beyond one request; owned by the response
/// cache and destroyed by TTL expiry or explicit invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedInsight {
    pub zodiac: String,
    pub insight: String,
    pub language: String,
    pub cached_at: DateTime<Utc>,
    pub ttl_minutes: u64,
}

impl CachedInsight {
    pub fn new(insight: &Insight, ttl_minutes: u64) -> Self {
        Self {
            zodiac: insight.zodiac.clone(),
            insight: insight.insight.clone(),
            language: insight.language.clone(),
            cached_at: Utc::now(),
            ttl_minutes,
        }
    }

    /// Unwraps back into the deliverable, verbatim
    pub fn into_insight(self) -> Insight {
        Insight {
            zodiac: self.zodiac,
            insight: self.insight,
            language: self.language,
        }
    }
}
