// Shared prompt fragments for tool-calling requests.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Sentence appended to system prompts that force a single function tool.
pub fn tool_only_instruction(tool_name: &str) -> String {
    format!("Always use the {tool_name} tool to return structured results.")
}
