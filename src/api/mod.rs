//! API layer - Tool surface consumed by the tool-calling protocol

pub mod error;
pub mod prompts;
pub mod tools;

pub use error::ToolError;
pub use prompts::knowledge_base_search_prompt;
pub use tools::KnowledgeBaseTools;
