//! Knowledge base validation utilities

use std::fmt;

use crate::domain::error::DomainError;

/// Smallest accepted `top_k`
pub const MIN_TOP_K: u32 = 1;

/// Largest accepted `top_k`
pub const MAX_TOP_K: u32 = 50;

/// Knowledge base validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeBaseValidationError {
    /// Knowledge base ID is empty
    EmptyId,
    /// Search query is empty
    EmptyQuery,
    /// Chat message is empty
    EmptyMessage,
    /// Invalid top_k value
    InvalidTopK { value: u32, min: u32, max: u32 },
    /// Invalid similarity threshold
    InvalidSimilarityThreshold { value: f64 },
    /// Unknown search mode
    InvalidSearchMode { value: String },
    /// Unknown chat role
    InvalidRole { value: String },
}

impl fmt::Display for KnowledgeBaseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Knowledge base ID cannot be empty"),
            Self::EmptyQuery => write!(f, "Search query cannot be empty"),
            Self::EmptyMessage => write!(f, "Chat message cannot be empty"),
            Self::InvalidTopK { value, min, max } => {
                write!(
                    f,
                    "Invalid top_k {}: must be between {} and {}",
                    value, min, max
                )
            }
            Self::InvalidSimilarityThreshold { value } => {
                write!(
                    f,
                    "Invalid similarity threshold {}: must be between 0.0 and 1.0",
                    value
                )
            }
            Self::InvalidSearchMode { value } => {
                write!(
                    f,
                    "Invalid search mode '{}': expected 'embedding' or 'keywords'",
                    value
                )
            }
            Self::InvalidRole { value } => {
                write!(
                    f,
                    "Invalid chat role '{}': expected 'user' or 'assistant'",
                    value
                )
            }
        }
    }
}

impl std::error::Error for KnowledgeBaseValidationError {}

impl From<KnowledgeBaseValidationError> for DomainError {
    fn from(error: KnowledgeBaseValidationError) -> Self {
        DomainError::validation(error.to_string())
    }
}

/// Validate a knowledge base ID; upstream IDs are opaque so only emptiness is checked
pub fn validate_knowledge_base_id(id: &str) -> Result<(), KnowledgeBaseValidationError> {
    if id.trim().is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyId);
    }

    Ok(())
}

/// Validate search query text
pub fn validate_query(query: &str) -> Result<(), KnowledgeBaseValidationError> {
    if query.trim().is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyQuery);
    }

    Ok(())
}

/// Validate a chat message
pub fn validate_message(message: &str) -> Result<(), KnowledgeBaseValidationError> {
    if message.trim().is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyMessage);
    }

    Ok(())
}

/// Validate top_k value
pub fn validate_top_k(top_k: u32) -> Result<(), KnowledgeBaseValidationError> {
    if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
        return Err(KnowledgeBaseValidationError::InvalidTopK {
            value: top_k,
            min: MIN_TOP_K,
            max: MAX_TOP_K,
        });
    }

    Ok(())
}

/// Validate similarity threshold (NaN is rejected)
pub fn validate_similarity_threshold(threshold: f64) -> Result<(), KnowledgeBaseValidationError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(KnowledgeBaseValidationError::InvalidSimilarityThreshold {
            value: threshold,
        });
    }

    Ok(())
}
