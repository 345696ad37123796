//! CLI module for the MaxKB adapter
//!
//! Each subcommand runs one knowledge base tool and prints its JSON result.

pub mod invoke;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

use crate::api::tools::{
    ASK_QUESTION, GET_KNOWLEDGE_BASE_INFO, LIST_KNOWLEDGE_BASES, SEARCH_KNOWLEDGE_BASE,
};
use crate::config::ApiVersion;
use crate::domain::knowledge_base::{DEFAULT_SIMILARITY, DEFAULT_TOP_K};
use crate::domain::SearchMode;

/// MaxKB adapter - Query MaxKB knowledge bases through uniform operations
#[derive(Parser)]
#[command(name = "maxkb-adapter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Upstream API generation (overrides config)
    #[arg(long, global = true)]
    pub api_version: Option<ApiVersion>,

    /// Workspace for the v2 API (overrides config)
    #[arg(long, global = true)]
    pub workspace_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all knowledge bases
    List,

    /// Show details of one knowledge base
    Get {
        knowledge_base_id: String,
    },

    /// Similarity search in a knowledge base
    Search(SearchArgs),

    /// Ask a question (v1 API only)
    Ask {
        knowledge_base_id: String,
        question: String,
    },

    /// Invoke a tool by name with JSON arguments
    Tool {
        name: String,
        #[arg(default_value = "{}")]
        arguments: String,
    },

    /// Print the knowledge base search prompt
    Prompt {
        knowledge_base_name: String,
        query: String,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    pub knowledge_base_id: String,

    pub query: String,

    /// Number of results (1-50)
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: u32,

    /// Minimum similarity (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_SIMILARITY)]
    pub similarity: f64,

    /// Retrieval mode: embedding or keywords
    #[arg(long, default_value_t = SearchMode::Embedding)]
    pub mode: SearchMode,
}

impl Command {
    /// Tool name and arguments for commands that go through the tool surface
    pub fn tool_call(&self) -> anyhow::Result<Option<(String, Value)>> {
        let call = match self {
            Self::List => (LIST_KNOWLEDGE_BASES.to_string(), Value::Null),
            Self::Get { knowledge_base_id } => (
                GET_KNOWLEDGE_BASE_INFO.to_string(),
                json!({ "knowledge_base_id": knowledge_base_id }),
            ),
            Self::Search(args) => (
                SEARCH_KNOWLEDGE_BASE.to_string(),
                json!({
                    "query": args.query,
                    "knowledge_base_id": args.knowledge_base_id,
                    "top_k": args.top_k,
                    "similarity": args.similarity,
                    "search_mode": args.mode,
                }),
            ),
            Self::Ask {
                knowledge_base_id,
                question,
            } => (
                ASK_QUESTION.to_string(),
                json!({ "question": question, "knowledge_base_id": knowledge_base_id }),
            ),
            Self::Tool { name, arguments } => (name.clone(), serde_json::from_str(arguments)?),
            Self::Prompt { .. } => return Ok(None),
        };

        Ok(Some(call))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_defaults() {
        let cli = Cli::parse_from(["maxkb-adapter", "search", "kb1", "reset password"]);
        let (name, arguments) = cli.command.tool_call().unwrap().unwrap();

        assert_eq!(name, SEARCH_KNOWLEDGE_BASE);
        assert_eq!(
            arguments,
            json!({
                "query": "reset password",
                "knowledge_base_id": "kb1",
                "top_k": 5,
                "similarity": 0.6,
                "search_mode": "embedding"
            })
        );
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "maxkb-adapter",
            "list",
            "--api-version",
            "v2",
            "--workspace-id",
            "team-a",
        ]);

        assert_eq!(cli.api_version, Some(ApiVersion::V2));
        assert_eq!(cli.workspace_id.as_deref(), Some("team-a"));
    }

    #[test]
    fn test_tool_command_parses_json() {
        let cli = Cli::parse_from([
            "maxkb-adapter",
            "tool",
            "get_knowledge_base_info",
            r#"{"knowledge_base_id": "kb1"}"#,
        ]);
        let (name, arguments) = cli.command.tool_call().unwrap().unwrap();

        assert_eq!(name, GET_KNOWLEDGE_BASE_INFO);
        assert_eq!(arguments["knowledge_base_id"], "kb1");

        let cli = Cli::parse_from(["maxkb-adapter", "tool", "list_knowledge_bases", "not json"]);
        assert!(cli.command.tool_call().is_err());
    }

    #[test]
    fn test_prompt_command_skips_tools() {
        let cli = Cli::parse_from(["maxkb-adapter", "prompt", "Docs", "how?"]);
        assert!(cli.command.tool_call().unwrap().is_none());
    }
}
