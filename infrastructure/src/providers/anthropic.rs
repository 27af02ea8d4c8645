//! Anthropic-style Messages API provider
//!
//! Tool results are sent back as `tool_result` blocks inside a `user` turn;
//! consecutive results share one turn.

use super::http::send_json;
use async_trait::async_trait;
use curlgen_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmProvider};
use curlgen_domain::{
    ContentBlock, LlmResponse, Message, MessageContent, ProviderKind, Role, StopReason,
    ToolDefinition,
};
use serde_json::{Value, json};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    api_version: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AnthropicStyle
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = build_request_body(request, self.max_tokens);
        debug!(model = request.model, messages = request.messages.len(), "POST messages");

        let value = send_json(
            self.client
                .post(format!("{}/v1/messages", self.base_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", &self.api_version)
                .json(&body),
        )
        .await?;

        parse_response(&value)
    }
}

pub(crate) fn build_request_body(request: &CompletionRequest<'_>, max_tokens: u32) -> Value {
    let mut body = json!({
        "model": request.model,
        "max_tokens": max_tokens,
        "messages": translate_messages(request.messages),
    });
    if !request.tools.is_empty() {
        body["tools"] = Value::Array(request.tools.iter().map(convert_tool).collect());
    }
    body
}

fn convert_tool(tool: &ToolDefinition) -> Value {
    json!({
        "name": tool.name,
        "description": tool.description,
        "input_schema": tool.input_schema,
    })
}

/// Translate the history into Messages API turns.
pub(crate) fn translate_messages(messages: &[Message]) -> Vec<Value> {
    let mut turns: Vec<Value> = Vec::with_capacity(messages.len());

    for message in messages {
        match &message.content {
            MessageContent::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                let mut block = json!({
                    "type": "tool_result",
                    "tool_use_id": tool_use_id,
                    "content": content,
                });
                if *is_error {
                    block["is_error"] = Value::Bool(true);
                }

                // Append to the previous user turn if it already carries tool results
                if let Some(last) = turns.last_mut()
                    && last["role"] == "user"
                    && let Some(blocks) = last["content"].as_array_mut()
                {
                    blocks.push(block);
                    continue;
                }
                turns.push(json!({"role": "user", "content": [block]}));
            }
            MessageContent::Blocks { blocks } if message.role == Role::Assistant => {
                let content: Vec<Value> = blocks.iter().map(convert_block).collect();
                turns.push(json!({"role": "assistant", "content": content}));
            }
            _ => {
                let role = if message.role == Role::Assistant {
                    "assistant"
                } else {
                    "user"
                };
                turns.push(json!({"role": role, "content": message.text()}));
            }
        }
    }
    turns
}

fn convert_block(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text { text } => json!({"type": "text", "text": text}),
        ContentBlock::ToolUse { id, name, input } => json!({
            "type": "tool_use",
            "id": id,
            "name": name,
            "input": input,
        }),
    }
}

pub(crate) fn parse_response(value: &Value) -> Result<LlmResponse, GatewayError> {
    let blocks = value
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::InvalidResponse("response has no content".to_string()))?;

    let content = blocks
        .iter()
        .filter_map(|block| match block.get("type").and_then(Value::as_str) {
            Some("text") => block
                .get("text")
                .and_then(Value::as_str)
                .map(ContentBlock::text),
            Some("tool_use") => Some(ContentBlock::ToolUse {
                id: str_field(block, "id"),
                name: str_field(block, "name"),
                input: block.get("input").cloned().unwrap_or(Value::Null),
            }),
            _ => None,
        })
        .collect();

    Ok(LlmResponse {
        content,
        stop_reason: value
            .get("stop_reason")
            .and_then(Value::as_str)
            .map(StopReason::from_stop_reason),
        model: value
            .get("model")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
