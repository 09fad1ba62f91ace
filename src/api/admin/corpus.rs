//! Corpus administration endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::retrieval::CorpusDocument;

#[derive(Debug, Serialize)]
pub struct CorpusInfoResponse {
    pub provider: &'static str,
    pub documents: usize,
    pub healthy: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoadCorpusRequest {
    pub documents: Vec<CorpusDocument>,
}

#[derive(Debug, Serialize)]
pub struct LoadCorpusResponse {
    pub loaded: usize,
}

/// GET /admin/corpus
pub async fn corpus_info(
    State(state): State<AppState>,
) -> Result<Json<CorpusInfoResponse>, ApiError> {
    let healthy = state.search.health_check().await.unwrap_or(false);
    let documents = if healthy { state.search.count().await? } else { 0 };

    Ok(Json(CorpusInfoResponse {
        provider: state.search.provider_type(),
        documents,
        healthy,
    }))
}

/// POST /admin/corpus/load
pub async fn load_corpus(
    State(state): State<AppState>,
    Json(request): Json<LoadCorpusRequest>,
) -> Result<Json<LoadCorpusResponse>, ApiError> {
    if request.documents.is_empty() {
        return Err(ApiError::bad_request("No documents to load"));
    }

    let loaded = state.search.add_documents(request.documents).await?;
    info!(loaded, "Corpus documents loaded");

    Ok(Json(LoadCorpusResponse { loaded }))
}
