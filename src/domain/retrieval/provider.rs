//! Vector search collaborator trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::item::{CorpusDocument, RetrievedItem, Topic};
use crate::domain::zodiac::ZodiacSign;
use crate::domain::DomainError;

/// Parameters for one similarity query
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text query embedded by the backend
    pub text: String,
    /// Exact-match filter on the sign metadata field
    pub sign: ZodiacSign,
    /// Optional additional exact-match filter on the topic field
    pub topic: Option<Topic>,
    /// Number of nearest items requested, ascending by distance
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, sign: ZodiacSign) -> Self {
        Self {
            text: text.into(),
            sign,
            topic: None,
            limit: 2,
        }
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Similarity search over the horoscope corpus.
///
/// Implementations translate between this contract and the backend's wire
/// format; results come back ordered by ascending cosine distance.
#[async_trait]
pub trait VectorSearch: Send + Sync + Debug {
    /// Runs one similarity query
    async fn query(&self, query: SearchQuery) -> Result<Vec<RetrievedItem>, DomainError>;

    /// Adds documents to the corpus, returning how many were accepted
    async fn add_documents(&self, documents: Vec<CorpusDocument>) -> Result<usize, DomainError>;

    /// Total documents in the corpus
    async fn count(&self) -> Result<usize, DomainError>;

    /// Whether the backend is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;

    /// Backend type name, for diagnostics
    fn provider_type(&self) -> &'static str;
}
