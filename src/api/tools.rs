//! Tool dispatch over the knowledge base gateway
//!
//! Tools take JSON arguments and always answer with a JSON value; failures are
//! rendered as error objects rather than propagated.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::error::ToolError;
use crate::domain::knowledge_base::{DEFAULT_SIMILARITY, DEFAULT_TOP_K};
use crate::domain::{
    ChatMessage, ChatRequest, DomainError, KnowledgeBase, KnowledgeBaseGateway, SearchMode,
    SearchRequest, SearchResult,
};

pub const LIST_KNOWLEDGE_BASES: &str = "list_knowledge_bases";
pub const GET_KNOWLEDGE_BASE_INFO: &str = "get_knowledge_base_info";
pub const SEARCH_KNOWLEDGE_BASE: &str = "search_knowledge_base";
pub const ASK_QUESTION: &str = "ask_question";

const LIST_RESOURCE_URI: &str = "knowledge-bases://list";
const KNOWLEDGE_BASE_RESOURCE_PREFIX: &str = "knowledge-base://";

#[derive(Debug, Deserialize)]
struct GetArgs {
    knowledge_base_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    knowledge_base_id: String,
    #[serde(default = "default_top_k")]
    top_k: u32,
    #[serde(default = "default_similarity")]
    similarity: f64,
    #[serde(default)]
    search_mode: SearchMode,
}

#[derive(Debug, Deserialize)]
struct AskArgs {
    question: String,
    knowledge_base_id: String,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_similarity() -> f64 {
    DEFAULT_SIMILARITY
}

/// Summary row of the listing tool
#[derive(Debug, Serialize)]
struct KnowledgeBaseSummary<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    document_count: u64,
}

impl<'a> From<&'a KnowledgeBase> for KnowledgeBaseSummary<'a> {
    fn from(kb: &'a KnowledgeBase) -> Self {
        Self {
            id: &kb.id,
            name: &kb.name,
            description: &kb.description,
            document_count: kb.document_count,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    total: usize,
    results: &'a [SearchResult],
}

#[derive(Debug, Serialize)]
struct AskOutput<'a> {
    question: &'a str,
    answer: &'a str,
    references: &'a [SearchResult],
}

/// Tool surface bound to one gateway instance
pub struct KnowledgeBaseTools<'a, G: KnowledgeBaseGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: KnowledgeBaseGateway + ?Sized> KnowledgeBaseTools<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Tool names usable against this gateway
    pub fn available_tools(&self) -> Vec<&'static str> {
        let mut tools = vec![
            LIST_KNOWLEDGE_BASES,
            GET_KNOWLEDGE_BASE_INFO,
            SEARCH_KNOWLEDGE_BASE,
        ];

        if self.gateway.supports_chat() {
            tools.push(ASK_QUESTION);
        }

        tools
    }

    /// Invoke a tool by name
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        debug!(tool = %name, "Calling tool");

        match self.dispatch(name, arguments).await {
            Ok(value) => value,
            Err(error) => {
                warn!(tool = %name, kind = error.kind(), %error, "Tool call failed");
                ToolError::from(&error).to_value()
            }
        }
    }

    /// Read a resource URI (`knowledge-bases://list` or `knowledge-base://{id}`)
    pub async fn read_resource(&self, uri: &str) -> Value {
        if uri == LIST_RESOURCE_URI {
            return self.call(LIST_KNOWLEDGE_BASES, Value::Null).await;
        }

        match uri.strip_prefix(KNOWLEDGE_BASE_RESOURCE_PREFIX) {
            Some(id) if !id.is_empty() => {
                self.call(GET_KNOWLEDGE_BASE_INFO, json!({ "knowledge_base_id": id }))
                    .await
            }
            _ => ToolError::new(format!("Unknown resource '{}'", uri)).to_value(),
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> Result<Value, DomainError> {
        match name {
            LIST_KNOWLEDGE_BASES => self.list_knowledge_bases().await,
            GET_KNOWLEDGE_BASE_INFO => {
                let args: GetArgs = parse_args(name, arguments)?;
                self.get_knowledge_base_info(&args.knowledge_base_id).await
            }
            SEARCH_KNOWLEDGE_BASE => {
                let args: SearchArgs = parse_args(name, arguments)?;
                self.search_knowledge_base(args).await
            }
            ASK_QUESTION => {
                let args: AskArgs = parse_args(name, arguments)?;
                self.ask_question(args).await
            }
            other => Err(DomainError::validation(format!("Unknown tool '{}'", other))),
        }
    }

    async fn list_knowledge_bases(&self) -> Result<Value, DomainError> {
        let knowledge_bases = self.gateway.list_knowledge_bases().await?;
        let summaries: Vec<KnowledgeBaseSummary<'_>> =
            knowledge_bases.iter().map(KnowledgeBaseSummary::from).collect();

        Ok(json!(summaries))
    }

    async fn get_knowledge_base_info(&self, id: &str) -> Result<Value, DomainError> {
        match self.gateway.get_knowledge_base(id).await? {
            Some(knowledge_base) => Ok(json!(knowledge_base)),
            None => Ok(ToolError::not_found().to_value()),
        }
    }

    async fn search_knowledge_base(&self, args: SearchArgs) -> Result<Value, DomainError> {
        let request = SearchRequest::builder(args.query.as_str(), args.knowledge_base_id)
            .top_k(args.top_k)
            .similarity(args.similarity)
            .search_mode(args.search_mode)
            .build()?;

        let response = self.gateway.search(request).await?;

        Ok(json!(SearchOutput {
            query: &args.query,
            total: response.total(),
            results: response.results(),
        }))
    }

    async fn ask_question(&self, args: AskArgs) -> Result<Value, DomainError> {
        let request = ChatRequest::new(args.question.as_str(), args.knowledge_base_id)?
            .with_history(args.history);

        let response = self.gateway.chat(request).await?;

        Ok(json!(AskOutput {
            question: &args.question,
            answer: &response.answer,
            references: &response.references,
        }))
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, DomainError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };

    serde_json::from_value(arguments).map_err(|e| {
        DomainError::validation(format!("Invalid arguments for tool '{}': {}", tool, e))
    })
}
