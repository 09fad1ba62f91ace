//! Daily almanac (Panchang) context collaborator

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Optional enrichment tags for one calendar day.
///
/// Used only as free-text hints in retrieval queries and synthesis prompts,
/// never as structural filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContext {
    pub nakshatra: Option<String>,
    pub tithi: Option<String>,
    pub yoga: Option<String>,
    pub weekday: Option<String>,
}

impl DailyContext {
    /// Renders the present tags as space-separated query terms
    pub fn query_terms(&self) -> String {
        [&self.nakshatra, &self.tithi, &self.yoga]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders the present tags as a labeled prompt line
    pub fn prompt_line(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(nakshatra) = &self.nakshatra {
            parts.push(format!("Nakshatra: {}", nakshatra));
        }
        if let Some(tithi) = &self.tithi {
            parts.push(format!("Tithi: {}", tithi));
        }
        if let Some(yoga) = &self.yoga {
            parts.push(format!("Yoga: {}", yoga));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// External almanac API, consulted best-effort before retrieval
#[async_trait]
pub trait AlmanacProvider: Send + Sync + Debug {
    /// Fetches context tags for a date; `None` when nothing is available
    async fn daily_context(&self, date: NaiveDate) -> Result<Option<DailyContext>, DomainError>;

    /// Whether the provider is configured at all
    fn is_available(&self) -> bool;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::time::Duration;

    /// Mock almanac returning a fixed context
    #[derive(Debug, Default)]
    pub struct MockAlmanac {
        context: Option<DailyContext>,
        delay: Option<Duration>,
    }

    impl MockAlmanac {
        pub fn with_context(context: DailyContext) -> Self {
            Self {
                context: Some(context),
                delay: None,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl AlmanacProvider for MockAlmanac {
        async fn daily_context(
            &self,
            _date: NaiveDate,
        ) -> Result<Option<DailyContext>, DomainError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.context.clone())
        }

        fn is_available(&self) -> bool {
            self.context.is_some()
        }
    }
}
