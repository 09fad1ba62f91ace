//! In-memory vector search backend for development and tests

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::retrieval::{CorpusDocument, RetrievedItem, SearchQuery, VectorSearch};
use crate::domain::DomainError;

/// Corpus search backed by a process-local document list.
///
/// Scoring is token overlap between the query text and the document text,
/// mapped to a pseudo cosine distance so callers see the same shape the
/// HTTP backend produces. Good enough to exercise the pipeline without an
/// embedding service.
#[derive(Debug, Default)]
pub struct InMemorySearch {
    documents: RwLock<Vec<CorpusDocument>>,
}

impl InMemorySearch {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokenize(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    fn distance(query_tokens: &HashSet<String>, document: &CorpusDocument) -> f32 {
        let searchable = format!(
            "{} {} {} {}",
            document.sign, document.topic, document.date_tag, document.text
        );
        let doc_tokens = Self::tokenize(&searchable);
        if query_tokens.is_empty() || doc_tokens.is_empty() {
            return 1.0;
        }

        let overlap = query_tokens.intersection(&doc_tokens).count() as f32;
        let similarity = overlap / query_tokens.len() as f32;
        1.0 - similarity
    }
}

#[async_trait]
impl VectorSearch for InMemorySearch {
    async fn query(&self, query: SearchQuery) -> Result<Vec<RetrievedItem>, DomainError> {
        let query_tokens = Self::tokenize(&query.text);
        let sign = query.sign.as_str();

        let documents = self.documents.read().await;
        let mut scored: Vec<(f32, &CorpusDocument)> = documents
            .iter()
            .filter(|d| d.sign == sign)
            .filter(|d| query.topic.is_none_or(|t| d.topic == t.as_str()))
            .map(|d| (Self::distance(&query_tokens, d), d))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(query.limit as usize)
            .map(|(distance, d)| {
                RetrievedItem::new(d.id.clone(), d.topic.clone(), d.text.clone(), distance)
                    .with_date_tag(d.date_tag.clone())
            })
            .collect())
    }

    async fn add_documents(&self, documents: Vec<CorpusDocument>) -> Result<usize, DomainError> {
        let count = documents.len();
        self.documents.write().await.extend(documents);
        Ok(count)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.documents.read().await.len())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }

    fn provider_type(&self) -> &'static str {
        "in_memory"
    }
}
