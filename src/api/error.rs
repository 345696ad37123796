//! Caller-visible error objects

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error returned to tool callers instead of propagating the failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            kind: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            error: "Knowledge base not found".to_string(),
            kind: Some("not_found".to_string()),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

impl From<&DomainError> for ToolError {
    fn from(error: &DomainError) -> Self {
        Self {
            error: error.to_string(),
            kind: Some(error.kind().to_string()),
        }
    }
}
