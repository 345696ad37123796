//! Knowledge base entity and related types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_knowledge_base_id, validate_query, validate_similarity_threshold, validate_top_k,
    KnowledgeBaseValidationError,
};
use crate::domain::error::DomainError;

/// Default number of search results
pub const DEFAULT_TOP_K: u32 = 5;

/// Default similarity threshold for search
pub const DEFAULT_SIMILARITY: f64 = 0.6;

/// Knowledge base as exposed by the upstream platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Upstream-assigned identifier, treated as opaque
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub document_count: u64,
    /// Creation timestamp as reported upstream
    #[serde(default)]
    pub create_time: String,
}

/// A single similarity search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    /// Similarity score, conventionally in [0, 1] but not clamped
    #[serde(default)]
    pub similarity: f64,
}

/// Retrieval strategy used by the upstream search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Embedding,
    Keywords,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::Keywords => "keywords",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = KnowledgeBaseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedding" => Ok(Self::Embedding),
            "keywords" => Ok(Self::Keywords),
            _ => Err(KnowledgeBaseValidationError::InvalidSearchMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Validated search request
///
/// Fields are private so that a request outside the accepted bounds cannot be
/// constructed; use [`SearchRequest::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    query: String,
    knowledge_base_id: String,
    top_k: u32,
    similarity: f64,
    search_mode: SearchMode,
}

impl SearchRequest {
    /// Create a request with default top_k, similarity and mode
    pub fn new(
        query: impl Into<String>,
        knowledge_base_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::builder(query, knowledge_base_id).build()
    }

    pub fn builder(
        query: impl Into<String>,
        knowledge_base_id: impl Into<String>,
    ) -> SearchRequestBuilder {
        SearchRequestBuilder {
            query: query.into(),
            knowledge_base_id: knowledge_base_id.into(),
            top_k: DEFAULT_TOP_K,
            similarity: DEFAULT_SIMILARITY,
            search_mode: SearchMode::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn knowledge_base_id(&self) -> &str {
        &self.knowledge_base_id
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }
}

/// Builder for [`SearchRequest`]; bounds are checked in [`SearchRequestBuilder::build`]
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    query: String,
    knowledge_base_id: String,
    top_k: u32,
    similarity: f64,
    search_mode: SearchMode,
}

impl SearchRequestBuilder {
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn similarity(mut self, similarity: f64) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }

    pub fn build(self) -> Result<SearchRequest, DomainError> {
        validate_query(&self.query)?;
        validate_knowledge_base_id(&self.knowledge_base_id)?;
        validate_top_k(self.top_k)?;
        validate_similarity_threshold(self.similarity)?;

        Ok(SearchRequest {
            query: self.query,
            knowledge_base_id: self.knowledge_base_id,
            top_k: self.top_k,
            similarity: self.similarity,
            search_mode: self.search_mode,
        })
    }
}

/// Search results in upstream relevance order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResponse {
    results: Vec<SearchResult>,
    total: usize,
}

impl SearchResponse {
    /// Build a response; `total` is always the number of results
    pub fn new(results: Vec<SearchResult>) -> Self {
        let total = results.len();
        Self { results, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
