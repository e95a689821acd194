/// LLM Client — the single point of entry for all AI gateway calls.
///
/// ARCHITECTURAL RULE: No other module may call the gateway directly.
/// All LLM interactions MUST go through this module.
///
/// The gateway speaks the OpenAI chat-completions dialect. Structured output is
/// obtained by forcing a single function tool and reading back its arguments.
/// Calls are never retried: the first failure is returned to the caller.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

pub mod prompts;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
/// The model used for all gateway calls.
/// Hardcoded so every deployment asks the same model for the same schema.
pub const MODEL: &str = "google/gemini-3-flash-preview";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM response carried no tool call")]
    NoToolCall,
}

/// A function the model is allowed (and forced) to call.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    tools: Vec<ToolSpec<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolSpec<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    function: &'a FunctionDefinition,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    function: ToolChoiceFunction<'a>,
}

#[derive(Debug, Serialize)]
struct ToolChoiceFunction<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: Option<String>,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, as produced by the model.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

impl ChatResponse {
    /// The first tool call of the first choice, if the model made one.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.tool_calls.as_ref())
            .and_then(|calls| calls.first())
    }
}

/// The single LLM client used by every service.
/// Wraps the gateway's chat-completions endpoint with tool-call helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
}

impl LlmClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Makes one call to the gateway forcing `tool`, returning the full response.
    pub async fn call(
        &self,
        api_key: &str,
        system: &str,
        prompt: &str,
        tool: &FunctionDefinition,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            tools: vec![ToolSpec {
                kind: "function",
                function: tool,
            }],
            tool_choice: ToolChoice {
                kind: "function",
                function: ToolChoiceFunction { name: tool.name },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("AI gateway error: {} {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                total_tokens = ?usage.total_tokens,
                "LLM call succeeded"
            );
        }

        Ok(chat)
    }

    /// Calls the gateway and returns the first tool call the model made.
    pub async fn call_tool(
        &self,
        api_key: &str,
        system: &str,
        prompt: &str,
        tool: &FunctionDefinition,
    ) -> Result<ToolCall, LlmError> {
        let response = self.call(api_key, system, prompt, tool).await?;
        response.first_tool_call().cloned().ok_or(LlmError::NoToolCall)
    }

    /// Convenience method that calls the gateway and deserializes the tool-call
    /// arguments as `T`.
    pub async fn call_tool_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        system: &str,
        prompt: &str,
        tool: &FunctionDefinition,
    ) -> Result<T, LlmError> {
        let call = self.call_tool(api_key, system, prompt, tool).await?;
        parse_arguments(&call)
    }
}

/// Decodes a tool call's JSON-encoded arguments.
pub fn parse_arguments<T: DeserializeOwned>(call: &ToolCall) -> Result<T, LlmError> {
    serde_json::from_str(&call.function.arguments).map_err(LlmError::Parse)
}
