//! OpenAI-style chat completions provider
//!
//! Speaks `POST /v1/chat/completions` with function tools and lists models
//! through `GET /v1/models`.

use super::http::send_json;
use async_trait::async_trait;
use curlgen_application::ports::llm_gateway::{
    CompletionRequest, GatewayError, LlmProvider, ModelCatalog,
};
use curlgen_domain::{
    ContentBlock, LlmResponse, Message, MessageContent, ProviderKind, ProviderModel, Role,
    StopReason, ToolDefinition,
};
use serde_json::{Value, json};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_tokens: Option<u32>,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiStyle
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = build_request_body(request, self.max_tokens);
        debug!(model = request.model, messages = request.messages.len(), "POST chat/completions");

        let value = send_json(
            self.client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body),
        )
        .await?;

        parse_response(&value)
    }
}

#[async_trait]
impl ModelCatalog for OpenAiProvider {
    async fn list_models(&self) -> Result<Vec<ProviderModel>, GatewayError> {
        let value = send_json(
            self.client
                .get(format!("{}/v1/models", self.base_url))
                .bearer_auth(&self.api_key),
        )
        .await?;
        parse_model_list(&value)
    }
}

/// Build the chat completions request body.
pub(crate) fn build_request_body(request: &CompletionRequest<'_>, max_tokens: Option<u32>) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": request.messages.iter().map(convert_message).collect::<Vec<_>>(),
    });

    if !request.tools.is_empty() {
        body["tools"] = Value::Array(request.tools.iter().map(convert_tool).collect());
    }
    if let Some(max) = max_tokens {
        body["max_tokens"] = json!(max);
    }
    body
}

fn convert_tool(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": tool.to_function_schema(),
    })
}

fn convert_message(message: &Message) -> Value {
    match (&message.role, &message.content) {
        (_, MessageContent::ToolResult {
            tool_use_id,
            content,
            ..
        }) => json!({
            "role": "tool",
            "tool_call_id": tool_use_id,
            "content": content,
        }),
        (Role::Assistant, MessageContent::Blocks { blocks }) => {
            let text = message.text();
            let tool_calls: Vec<Value> = blocks
                .iter()
                .filter_map(|b| b.as_tool_use())
                .map(|(id, name, input)| {
                    json!({
                        "id": id,
                        "type": "function",
                        "function": {
                            "name": name,
                            "arguments": arguments_string(input),
                        },
                    })
                })
                .collect();

            let mut msg = json!({
                "role": "assistant",
                "content": if text.is_empty() { Value::Null } else { Value::String(text) },
            });
            if !tool_calls.is_empty() {
                msg["tool_calls"] = Value::Array(tool_calls);
            }
            msg
        }
        (role, _) => json!({
            "role": if *role == Role::Assistant { "assistant" } else { "user" },
            "content": message.text(),
        }),
    }
}

/// Tool arguments travel as a JSON-encoded string.
fn arguments_string(input: &Value) -> String {
    match input {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Normalize a chat completions response.
pub(crate) fn parse_response(value: &Value) -> Result<LlmResponse, GatewayError> {
    let choice = value
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;
    let message = choice
        .get("message")
        .ok_or_else(|| GatewayError::InvalidResponse("choice has no message".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = message.get("content").and_then(Value::as_str)
        && !text.is_empty()
    {
        content.push(ContentBlock::text(text));
    }

    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        for call in calls {
            let id = call.get("id").and_then(Value::as_str).unwrap_or_default();
            let Some(function) = call.get("function") else {
                continue;
            };
            let name = function
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let input = match function.get("arguments") {
                Some(Value::String(raw)) => {
                    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
                }
                Some(other) => other.clone(),
                None => Value::Null,
            };
            content.push(ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input,
            });
        }
    }

    let stop_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .map(StopReason::from_finish_reason);

    Ok(LlmResponse {
        content,
        stop_reason,
        model: value
            .get("model")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

pub(crate) fn parse_model_list(value: &Value) -> Result<Vec<ProviderModel>, GatewayError> {
    let data = value
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::InvalidResponse("model list has no data".to_string()))?;

    Ok(data
        .iter()
        .filter_map(|m| m.get("id").and_then(Value::as_str))
        .map(ProviderModel::openai)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curlgen_domain::propose_commands_tool;

    #[test]
    fn test_request_body_with_tools_and_history() {
        let tools = vec![propose_commands_tool()];
        let messages = vec![
            Message::user("test the API"),
            Message::assistant(vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "generateCurlCommands".to_string(),
                input: json!({"commands": []}),
            }]),
            Message::tool_result("call_1", "Here are the results"),
        ];
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            tools: &tools,
        };

        let body = build_request_body(&request, None);
        assert_eq!(body["model"], "gpt-4o");
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "generateCurlCommands");

        let msgs = body["messages"].as_array().unwrap();
        assert_eq!(msgs[0], json!({"role": "user", "content": "test the API"}));
        assert_eq!(msgs[1]["role"], "assistant");
        assert_eq!(msgs[1]["content"], Value::Null);
        assert_eq!(msgs[1]["tool_calls"][0]["id"], "call_1");
        assert_eq!(
            msgs[1]["tool_calls"][0]["function"]["arguments"],
            r#"{"commands":[]}"#
        );
        assert_eq!(
            msgs[2],
            json!({"role": "tool", "tool_call_id": "call_1", "content": "Here are the results"})
        );
    }

    #[test]
    fn test_request_body_without_tools() {
        let messages = vec![Message::user("hi")];
        let request = CompletionRequest {
            model: "o1-mini",
            messages: &messages,
            tools: &[],
        };
        let body = build_request_body(&request, Some(512));
        assert!(body.get("tools").is_none());
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_parse_tool_call_response() {
        let value = json!({
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "generateCurlCommands",
                            "arguments": "{\"commands\":[{\"command\":\"curl API_URL\",\"expected_success\":true}]}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = parse_response(&value).unwrap();
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert!(response.stopped_for_tools());
        let calls = response.tool_uses();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "call_abc");
        assert_eq!(calls[0].2["commands"][0]["command"], "curl API_URL");
        assert_eq!(response.model.as_deref(), Some("gpt-4o-2024-08-06"));
    }

    #[test]
    fn test_parse_unparseable_arguments_kept_as_string() {
        let value = json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {"name": "generateCurlCommands", "arguments": "{not json"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let response = parse_response(&value).unwrap();
        assert_eq!(response.tool_uses()[0].2, &Value::String("{not json".to_string()));
    }

    #[test]
    fn test_parse_text_response() {
        let value = json!({
            "choices": [{"message": {"content": "All done."}, "finish_reason": "stop"}]
        });
        let response = parse_response(&value).unwrap();
        assert_eq!(response.text_content(), "All done.");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_parse_missing_choices() {
        let err = parse_response(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_model_list() {
        let value = json!({
            "object": "list",
            "data": [{"id": "gpt-4o", "object": "model"}, {"id": "o1-mini"}]
        });
        let models = parse_model_list(&value).unwrap();
        let ids: Vec<_> = models.iter().map(|m| m.canonical_id()).collect();
        assert_eq!(ids, vec!["gpt-4o", "o1-mini"]);
        assert_eq!(models[0].kind(), ProviderKind::OpenAiStyle);
    }
}
