use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use knowledge::prompt::system_prompt;
use knowledge::{corpus, Document, KnowledgeIndex, ScoringParams, DEFAULT_MAX_RESULTS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upper bound on `k` / `n_results` accepted over HTTP.
const MAX_K: usize = 50;
const NO_MATCH: &str = "No relevant documents found.";

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_MAX_RESULTS }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub id: String,
    pub category: String,
    pub score: f64,
    pub text: String,
}

#[derive(Deserialize)]
pub struct RagRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_k")]
    pub n_results: usize,
}

#[derive(Serialize)]
pub struct RagResponse {
    pub query: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct ContextRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ContextResponse {
    pub context: Option<String>,
    pub system_prompt: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub documents: usize,
    pub terms: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<KnowledgeIndex>,
}

/// Build the index from `corpus_path` (or the builtin portfolio corpus) and wire up the routes.
pub fn build_app(corpus_path: Option<String>, params: ScoringParams) -> Result<Router> {
    let docs = match &corpus_path {
        Some(path) => corpus::load(path).with_context(|| format!("loading corpus from {path}"))?,
        None => corpus::builtin()?,
    };
    let index = KnowledgeIndex::with_params(docs, params);
    Ok(router(Arc::new(index)))
}

pub fn router(index: Arc<KnowledgeIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/search", get(search_handler))
        .route("/doc/:id", get(doc_handler))
        .route("/api/rag", post(rag_handler))
        .route("/api/context", post(context_handler))
        .with_state(AppState { index })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "maya-knowledge",
        documents: state.index.num_docs(),
        terms: state.index.vocabulary_size(),
    })
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);
    // Rank the whole corpus so total_hits counts every document above the floor
    let hits = state.index.search(&params.q, state.index.num_docs());
    let total_hits = hits.len();
    let results: Vec<SearchHit> = hits
        .into_iter()
        .take(k)
        .map(|h| SearchHit {
            rank: h.rank,
            id: h.doc.id.clone(),
            category: h.doc.category.clone(),
            score: h.score,
            text: h.doc.text.clone(),
        })
        .collect();
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, returned = results.len(), "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, (StatusCode, Json<serde_json::Value>)> {
    match state.index.document(&id) {
        Some(doc) => Ok(Json(doc.clone())),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

pub async fn rag_handler(State(state): State<AppState>, Json(req): Json<RagRequest>) -> Json<RagResponse> {
    let context = state.index.query(&req.query, req.n_results.clamp(1, MAX_K));
    tracing::info!(query = %req.query, matched = context.is_some(), "rag query");
    Json(RagResponse { query: req.query, context: context.unwrap_or_else(|| NO_MATCH.to_string()) })
}

/// Retrieval half of a chat turn: ground the system prompt on the latest message.
pub async fn context_handler(State(state): State<AppState>, Json(req): Json<ContextRequest>) -> Json<ContextResponse> {
    let last = req.messages.last().map(|m| m.content.as_str()).unwrap_or("");
    let context = state.index.query(last, DEFAULT_MAX_RESULTS);
    if context.is_some() {
        tracing::info!(query = %last, "found relevant context");
    } else {
        tracing::info!(query = %last, "no specific context, using base prompt");
    }
    let prompt = system_prompt(context.as_deref());
    Json(ContextResponse { context, system_prompt: prompt })
}
