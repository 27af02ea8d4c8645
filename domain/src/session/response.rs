//! Normalized LLM response types.
//!
//! Both provider families return a mix of text and tool-use requests. The
//! adapters convert their wire formats into [`LlmResponse`] so the driver
//! handles one shape:
//!
//! ```text
//! OpenAI:     message.content + message.tool_calls[] + finish_reason
//! Anthropic:  content[] (text | tool_use)            + stop_reason
//!                         │
//!                         ▼
//!             LlmResponse { content: Vec<ContentBlock>, stop_reason }
//! ```

use serde::{Deserialize, Serialize};

/// A single block of content within an LLM response.
///
/// # Examples
///
/// ```
/// use curlgen_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::text("Here are the commands.");
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "toolu_abc123".to_string(),
///     name: "generateCurlCommands".to_string(),
///     input: serde_json::json!({"commands": []}),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text { text: String },

    /// A tool use request from the model.
    ToolUse {
        /// Provider-assigned id used to correlate the tool result.
        id: String,
        /// Tool name as emitted by the model.
        name: String,
        /// Tool arguments. OpenAI-style arguments that are not valid JSON
        /// are kept verbatim as a JSON string.
        input: serde_json::Value,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &serde_json::Value)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response (`stop` / `end_turn`).
    EndTurn,
    /// The model wants to call tools (`tool_calls` / `tool_use`).
    ToolUse,
    /// Hit the token limit (`length` / `max_tokens`).
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }

    /// Map an Anthropic-style `stop_reason`.
    pub fn from_stop_reason(reason: &str) -> Self {
        match reason {
            "end_turn" | "stop_sequence" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::ToolUse => write!(f, "tool_use"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A provider reply, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// All `ToolUse` blocks as `(id, name, input)`, in order.
    pub fn tool_uses(&self) -> Vec<(&str, &str, &serde_json::Value)> {
        self.content.iter().filter_map(|b| b.as_tool_use()).collect()
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// Returns `true` if the provider said it stopped to call tools.
    pub fn stopped_for_tools(&self) -> bool {
        self.stop_reason == Some(StopReason::ToolUse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_text_creates_text_only_response() {
        let response = LlmResponse::from_text("done");
        assert_eq!(response.text_content(), "done");
        assert!(!response.has_tool_calls());
        assert!(response.tool_uses().is_empty());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn tool_uses_keep_order() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::text("two batches"),
                ContentBlock::ToolUse {
                    id: "a".to_string(),
                    name: "generateCurlCommands".to_string(),
                    input: json!({"commands": []}),
                },
                ContentBlock::ToolUse {
                    id: "b".to_string(),
                    name: "generateCurlCommands".to_string(),
                    input: json!({"commands": []}),
                },
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        };
        let ids: Vec<_> = response.tool_uses().iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(response.stopped_for_tools());
        assert_eq!(response.text_content(), "two batches");
    }

    #[test]
    fn finish_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason("tool_calls"), StopReason::ToolUse);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason("done"),
            StopReason::Other("done".to_string())
        );
    }

    #[test]
    fn stop_reason_mapping() {
        assert_eq!(StopReason::from_stop_reason("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_stop_reason("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from_stop_reason("max_tokens"), StopReason::MaxTokens);
    }

    #[test]
    fn content_block_serde_shape() {
        let block = ContentBlock::text("hi");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hi"}));
    }
}
