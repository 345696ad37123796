//! Conversational Q&A types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::SearchResult;
use super::validation::{
    validate_knowledge_base_id, validate_message, KnowledgeBaseValidationError,
};
use crate::domain::error::DomainError;

/// Answer returned when the upstream produced nothing usable
pub const NO_ANSWER_FALLBACK: &str = "Sorry, no answer could be obtained.";

/// Role of a participant in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl FromStr for ChatRole {
    type Err = KnowledgeBaseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(KnowledgeBaseValidationError::InvalidRole {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A question addressed to a knowledge base, with optional prior turns
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    message: String,
    knowledge_base_id: String,
    history: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(
        message: impl Into<String>,
        knowledge_base_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let message = message.into();
        let knowledge_base_id = knowledge_base_id.into();

        validate_message(&message)?;
        validate_knowledge_base_id(&knowledge_base_id)?;

        Ok(Self {
            message,
            knowledge_base_id,
            history: Vec::new(),
        })
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn knowledge_base_id(&self) -> &str {
        &self.knowledge_base_id
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Prior turns followed by the current user message
    pub fn conversation(&self) -> Vec<ChatMessage> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(self.message.clone()));
        messages
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub references: Vec<SearchResult>,
}

impl ChatResponse {
    pub fn new(answer: impl Into<String>, references: Vec<SearchResult>) -> Self {
        Self {
            answer: answer.into(),
            references,
        }
    }

    /// Response used when the upstream returned no usable payload
    pub fn fallback() -> Self {
        Self::new(NO_ANSWER_FALLBACK, Vec::new())
    }
}
