//! Domain layer - Stable knowledge base types, independent of the upstream API shape

pub mod error;
pub mod knowledge_base;

pub use error::DomainError;
pub use knowledge_base::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, KnowledgeBase, KnowledgeBaseGateway,
    KnowledgeBaseValidationError, SearchMode, SearchRequest, SearchResponse, SearchResult,
    NO_ANSWER_FALLBACK,
};
