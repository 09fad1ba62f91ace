//! Per-topic retrieval fan-out over the horoscope corpus

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::almanac::DailyContext;
use crate::domain::retrieval::{RetrievedItem, SearchQuery, Topic, VectorSearch};
use crate::domain::zodiac::ZodiacSign;
use crate::domain::DomainError;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Tuning knobs for the retrieval fan-out
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Nearest items requested per topic
    pub per_topic_limit: u32,
    /// Whether the topic is also applied as a server-side metadata filter,
    /// in addition to appearing in the query text
    pub filter_by_topic: bool,
    /// Budget for each individual topic query
    pub query_timeout: Duration,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            per_topic_limit: 2,
            filter_by_topic: false,
            query_timeout: Duration::from_secs(10),
        }
    }
}

/// Aggregates corpus evidence for one sign across all topics.
///
/// Topics are queried concurrently but results always come back in the fixed
/// topic-list order. A single failed topic degrades to zero items for that
/// topic; only a whole-backend outage (every topic failing) is an error.
#[derive(Debug)]
pub struct RetrievalService {
    search: Arc<dyn VectorSearch>,
    options: RetrievalOptions,
}

impl RetrievalService {
    pub fn new(search: Arc<dyn VectorSearch>, options: RetrievalOptions) -> Self {
        Self { search, options }
    }

    fn query_text(
        sign: ZodiacSign,
        topic: Topic,
        as_of: NaiveDate,
        context: Option<&DailyContext>,
    ) -> String {
        let weekday = WEEKDAYS[as_of.weekday().num_days_from_monday() as usize];
        let mut text = format!(
            "zodiac {} category {} date {} {}",
            sign.as_str(),
            topic.as_str(),
            as_of.format("%Y%m%d"),
            weekday
        );

        if let Some(context) = context {
            let terms = context.query_terms();
            if !terms.is_empty() {
                text.push(' ');
                text.push_str(&terms);
            }
        }

        text
    }

    async fn query_topic(
        &self,
        sign: ZodiacSign,
        topic: Topic,
        as_of: NaiveDate,
        context: Option<&DailyContext>,
    ) -> Result<Vec<RetrievedItem>, DomainError> {
        let mut query = SearchQuery::new(Self::query_text(sign, topic, as_of, context), sign)
            .with_limit(self.options.per_topic_limit);
        if self.options.filter_by_topic {
            query = query.with_topic(topic);
        }

        tokio::time::timeout(self.options.query_timeout, self.search.query(query))
            .await
            .map_err(|_| {
                DomainError::retrieval(format!("Query for topic '{}' timed out", topic))
            })?
    }

    /// Runs the fan-out for one sign and date
    pub async fn aggregate(
        &self,
        sign: ZodiacSign,
        as_of: NaiveDate,
        context: Option<&DailyContext>,
    ) -> Result<Vec<RetrievedItem>, DomainError> {
        let queries = Topic::ALL
            .into_iter()
            .map(|topic| async move { (topic, self.query_topic(sign, topic, as_of, context).await) });

        let outcomes = join_all(queries).await;

        let mut items = Vec::new();
        let mut failed = 0usize;
        for (topic, outcome) in outcomes {
            match outcome {
                Ok(topic_items) => {
                    debug!(
                        topic = topic.as_str(),
                        count = topic_items.len(),
                        "Topic retrieval complete"
                    );
                    items.extend(topic_items);
                }
                Err(e) => {
                    warn!(topic = topic.as_str(), error = %e, "Topic retrieval failed");
                    failed += 1;
                }
            }
        }

        if failed == Topic::ALL.len() {
            return Err(DomainError::retrieval(
                "Search backend unavailable: every topic query failed",
            ));
        }

        Ok(items)
    }
}
