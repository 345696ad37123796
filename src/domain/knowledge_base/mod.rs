//! Knowledge Base domain - listing, similarity search and Q&A

mod chat;
mod entity;
mod provider;
mod validation;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole, NO_ANSWER_FALLBACK};
pub use entity::{
    KnowledgeBase, SearchMode, SearchRequest, SearchRequestBuilder, SearchResponse, SearchResult,
    DEFAULT_SIMILARITY, DEFAULT_TOP_K,
};
pub use provider::KnowledgeBaseGateway;
pub use validation::{KnowledgeBaseValidationError, MAX_TOP_K, MIN_TOP_K};

#[cfg(test)]
pub use provider::MockKnowledgeBaseGateway;
