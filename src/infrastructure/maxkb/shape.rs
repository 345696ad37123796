//! Upstream API generations
//!
//! Each shape knows its endpoint paths and payload layout; the client never
//! branches on the API version itself.

use std::fmt::Debug;

use serde_json::{json, Value};

use crate::config::ApiVersion;
use crate::domain::{ChatRequest, SearchMode, SearchRequest, DomainError};
use crate::domain::knowledge_base::DEFAULT_SIMILARITY;

/// Path and JSON body for one upstream call
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCall {
    pub path: String,
    pub body: Value,
}

/// Strategy describing one upstream API generation
pub trait ApiShape: Send + Sync + Debug {
    fn version(&self) -> ApiVersion;

    fn list_path(&self) -> String;

    fn get_path(&self, id: &str) -> String;

    fn search_call(&self, request: &SearchRequest) -> UpstreamCall;

    /// `None` when this generation has no chat endpoint
    fn chat_call(&self, request: &ChatRequest) -> Option<UpstreamCall>;

    fn supports_chat(&self) -> bool;
}

/// Shape A: dataset-centric v1 API
#[derive(Debug, Clone, Default)]
pub struct DatasetApi;

impl ApiShape for DatasetApi {
    fn version(&self) -> ApiVersion {
        ApiVersion::V1
    }

    fn list_path(&self) -> String {
        "/dataset".to_string()
    }

    fn get_path(&self, id: &str) -> String {
        format!("/dataset/{}", id)
    }

    // hit_test on this generation only honours the fixed embedding mode and threshold
    fn search_call(&self, request: &SearchRequest) -> UpstreamCall {
        UpstreamCall {
            path: format!("/dataset/{}/hit_test", request.knowledge_base_id()),
            body: json!({
                "query": request.query(),
                "top_number": request.top_k(),
                "search_mode": SearchMode::Embedding.as_str(),
                "similarity": DEFAULT_SIMILARITY,
            }),
        }
    }

    fn chat_call(&self, request: &ChatRequest) -> Option<UpstreamCall> {
        Some(UpstreamCall {
            path: "/application/chat".to_string(),
            body: json!({
                "message": request.message(),
                "re_chat": false,
                "stream": false,
                "application_id": request.knowledge_base_id(),
            }),
        })
    }

    fn supports_chat(&self) -> bool {
        true
    }
}

/// Shape B: workspace-scoped v2 API
#[derive(Debug, Clone)]
pub struct WorkspaceApi {
    workspace_id: String,
}

impl WorkspaceApi {
    pub fn new(workspace_id: impl Into<String>) -> Result<Self, DomainError> {
        let workspace_id = workspace_id.into();
        if workspace_id.trim().is_empty() {
            return Err(DomainError::configuration(
                "A workspace ID is required for MaxKB API v2",
            ));
        }

        Ok(Self { workspace_id })
    }

    fn knowledge_root(&self) -> String {
        format!("/workspace/{}/knowledge", self.workspace_id)
    }
}

impl ApiShape for WorkspaceApi {
    fn version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    fn list_path(&self) -> String {
        self.knowledge_root()
    }

    fn get_path(&self, id: &str) -> String {
        format!("{}/{}", self.knowledge_root(), id)
    }

    fn search_call(&self, request: &SearchRequest) -> UpstreamCall {
        UpstreamCall {
            path: format!(
                "{}/{}/hit_test",
                self.knowledge_root(),
                request.knowledge_base_id()
            ),
            body: json!({
                "query_text": request.query(),
                "top_number": request.top_k(),
                "search_mode": request.search_mode().as_str(),
                "similarity": request.similarity(),
            }),
        }
    }

    fn chat_call(&self, _request: &ChatRequest) -> Option<UpstreamCall> {
        None
    }

    fn supports_chat(&self) -> bool {
        false
    }
}

/// Select the shape for a configured API version
pub fn shape_for(
    version: ApiVersion,
    workspace_id: &str,
) -> Result<Box<dyn ApiShape>, DomainError> {
    match version {
        ApiVersion::V1 => Ok(Box::new(DatasetApi)),
        ApiVersion::V2 => Ok(Box::new(WorkspaceApi::new(workspace_id)?)),
    }
}
