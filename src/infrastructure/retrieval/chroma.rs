//! Chroma-compatible HTTP vector search client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::retrieval::{CorpusDocument, RetrievedItem, SearchQuery, VectorSearch};
use crate::domain::DomainError;

const DEFAULT_CHROMA_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a Chroma-style vector search service.
///
/// The backend embeds query texts itself and returns cosine distances;
/// metadata carries the corpus fields (sign, category, date, horoscope).
#[derive(Debug)]
pub struct ChromaSearch {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    request_timeout: Duration,
}

impl ChromaSearch {
    pub fn new(collection: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_CHROMA_BASE_URL, collection)
    }

    pub fn with_base_url(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    fn collection_url(&self, operation: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url, self.collection, operation
        )
    }

    fn build_where_filter(query: &SearchQuery) -> serde_json::Value {
        match query.topic {
            // Single-field exact match is the backend's native form; the
            // two-field case needs an explicit $and.
            None => json!({ "sign": query.sign.as_str() }),
            Some(topic) => json!({
                "$and": [
                    { "sign": query.sign.as_str() },
                    { "category": topic.as_str() },
                ]
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChromaQueryResponse {
    ids: Vec<Vec<String>>,
    metadatas: Vec<Vec<ChromaMetadata>>,
    #[serde(default)]
    distances: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct ChromaMetadata {
    #[serde(default)]
    category: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    horoscope: String,
}

#[async_trait]
impl VectorSearch for ChromaSearch {
    async fn query(&self, query: SearchQuery) -> Result<Vec<RetrievedItem>, DomainError> {
        let body = json!({
            "query_texts": [query.text],
            "n_results": query.limit,
            "where": Self::build_where_filter(&query),
            "include": ["metadatas", "distances"],
        });

        let response = self
            .client
            .post(self.collection_url("query"))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::retrieval(format!("Chroma query failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::retrieval(format!(
                "Chroma query returned status {}",
                response.status()
            )));
        }

        let parsed: ChromaQueryResponse = response
            .json()
            .await
            .map_err(|e| DomainError::retrieval(format!("Invalid Chroma response: {}", e)))?;

        let ids = parsed.ids.into_iter().next().unwrap_or_default();
        let metadatas = parsed.metadatas.into_iter().next().unwrap_or_default();
        let distances = parsed.distances.into_iter().next().unwrap_or_default();

        let items = ids
            .into_iter()
            .zip(metadatas)
            .enumerate()
            .map(|(i, (id, meta))| {
                RetrievedItem::new(
                    id,
                    meta.category,
                    meta.horoscope,
                    distances.get(i).copied().unwrap_or(0.0),
                )
                .with_date_tag(meta.date)
            })
            .collect();

        Ok(items)
    }

    async fn add_documents(&self, documents: Vec<CorpusDocument>) -> Result<usize, DomainError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let count = documents.len();
        let ids: Vec<&String> = documents.iter().map(|d| &d.id).collect();
        let texts: Vec<String> = documents
            .iter()
            .map(|d| {
                format!(
                    "Zodiac: {}, Category: {}, Date: {}, Horoscope: {}",
                    d.sign, d.topic, d.date_tag, d.text
                )
            })
            .collect();
        let metadatas: Vec<serde_json::Value> = documents
            .iter()
            .map(|d| {
                json!({
                    "sign": d.sign,
                    "category": d.topic,
                    "date": d.date_tag,
                    "horoscope": d.text,
                })
            })
            .collect();

        let body = json!({
            "ids": ids,
            "documents": texts,
            "metadatas": metadatas,
        });

        let response = self
            .client
            .post(self.collection_url("add"))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::retrieval(format!("Chroma add failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::retrieval(format!(
                "Chroma add returned status {}",
                response.status()
            )));
        }

        Ok(count)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let response = self
            .client
            .get(self.collection_url("count"))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| DomainError::retrieval(format!("Chroma count failed: {}", e)))?;

        let count: usize = response
            .json()
            .await
            .map_err(|e| DomainError::retrieval(format!("Invalid count response: {}", e)))?;

        Ok(count)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let url = format!("{}/api/v1/heartbeat", self.base_url);

        match self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn provider_type(&self) -> &'static str {
        "chroma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::Topic;
    use crate::domain::zodiac::ZodiacSign;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_query_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/collections/horoscopes/query"))
            .and(body_partial_json(json!({
                "n_results": 2,
                "where": { "sign": "leo" },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ids": [["leo_0101_1", "leo_0102_2"]],
                "metadatas": [[
                    {"sign": "leo", "category": "love", "date": "20240101", "horoscope": "Romance blossoms."},
                    {"sign": "leo", "category": "love", "date": "20240102", "horoscope": "Old bonds deepen."}
                ]],
                "distances": [[0.12, 0.34]],
            })))
            .mount(&server)
            .await;

        let search = ChromaSearch::with_base_url(server.uri(), "horoscopes");
        let query = SearchQuery::new("zodiac leo category love", ZodiacSign::Leo).with_limit(2);

        let items = search.query(query).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "leo_0101_1");
        assert_eq!(items[0].topic, "love");
        assert_eq!(items[0].date_tag, "20240101");
        assert!((items[0].relevance_score() - 0.88).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_query_with_topic_filter_sends_and_clause() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/collections/horoscopes/query"))
            .and(body_partial_json(json!({
                "where": { "$and": [{ "sign": "leo" }, { "category": "career" }] },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ids": [[]],
                "metadatas": [[]],
                "distances": [[]],
            })))
            .mount(&server)
            .await;

        let search = ChromaSearch::with_base_url(server.uri(), "horoscopes");
        let query =
            SearchQuery::new("zodiac leo category career", ZodiacSign::Leo).with_topic(Topic::Career);

        let items = search.query(query).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_query_surfaces_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/collections/horoscopes/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let search = ChromaSearch::with_base_url(server.uri(), "horoscopes");
        let result = search
            .query(SearchQuery::new("q", ZodiacSign::Leo))
            .await;

        assert!(matches!(result, Err(DomainError::Retrieval { .. })));
    }

    #[tokio::test]
    async fn test_health_check_down_is_false_not_error() {
        // Nothing listening on this port
        let search = ChromaSearch::with_base_url("http://127.0.0.1:1", "horoscopes");
        assert!(!search.health_check().await.unwrap());
    }
}
