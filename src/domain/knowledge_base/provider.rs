//! Knowledge base gateway trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::chat::{ChatRequest, ChatResponse};
use super::entity::{KnowledgeBase, SearchRequest, SearchResponse};
use crate::domain::error::DomainError;

/// Uniform knowledge base operations, independent of the upstream API generation
///
/// Upstream "no data" answers are normalized into empty results; only
/// transport-level failures are returned as errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseGateway: Send + Sync {
    /// List every knowledge base visible to the configured credential
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>, DomainError>;

    /// Fetch a single knowledge base; `None` when the upstream has nothing for the ID
    async fn get_knowledge_base(&self, id: &str) -> Result<Option<KnowledgeBase>, DomainError>;

    /// Run a similarity search against one knowledge base
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, DomainError>;

    /// Ask a question; fails with `Unsupported` when the upstream has no chat endpoint
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, DomainError>;

    /// Whether `chat` is available for this deployment
    fn supports_chat(&self) -> bool;
}
