//! Prompt templates offered alongside the knowledge base tools

/// Prompt asking an assistant to answer from a named knowledge base
pub fn knowledge_base_search_prompt(query: &str, knowledge_base_name: &str) -> String {
    format!(
        r#"You are a helpful assistant with access to the "{knowledge_base_name}" knowledge base.

The user is asking: {query}

Search the knowledge base for relevant information and give a thorough answer based on the results. If the results do not contain enough information, tell the user.

When answering:
1. Use the information from the knowledge base
2. Cite specific sources where possible
3. Be concise but complete
4. If the information is incomplete, state the limitations
"#
    )
}
