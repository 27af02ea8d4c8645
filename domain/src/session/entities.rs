//! Conversation entities

use crate::session::response::ContentBlock;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Result of a tool call, sent back to the model.
    ///
    /// OpenAI-style providers encode this as a `tool` message; Anthropic-style
    /// providers fold it into a `user` turn with a `tool_result` block.
    Tool,
}

/// Content of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain text (user prompts).
    Text { text: String },
    /// Assistant output as returned by the provider, tool calls included.
    Blocks { blocks: Vec<ContentBlock> },
    /// Structured result for one tool call.
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text { text: text.into() },
        }
    }

    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks { blocks },
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
                is_error: false,
            },
        }
    }

    /// A tool result reporting that the call could not be honored.
    pub fn tool_error(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
                is_error: true,
            },
        }
    }

    /// Concatenated text of this message, tool-use blocks excluded.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text { text } => text.clone(),
            MessageContent::Blocks { blocks } => blocks
                .iter()
                .filter_map(|b| b.as_text())
                .collect::<Vec<_>>()
                .join(""),
            MessageContent::ToolResult { content, .. } => content.clone(),
        }
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self.content, MessageContent::ToolResult { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() {
        let msg = Message::user("generate tests");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), "generate tests");
        assert!(!msg.is_tool_result());
    }

    #[test]
    fn test_assistant_text_skips_tool_use() {
        let msg = Message::assistant(vec![
            ContentBlock::text("Running "),
            ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "generateCurlCommands".to_string(),
                input: json!({"commands": []}),
            },
            ContentBlock::text("now"),
        ]);
        assert_eq!(msg.text(), "Running now");
    }

    #[test]
    fn test_tool_error_flag() {
        let ok = Message::tool_result("id", "fine");
        let err = Message::tool_error("id", "bad payload");
        assert!(matches!(ok.content, MessageContent::ToolResult { is_error: false, .. }));
        assert!(matches!(err.content, MessageContent::ToolResult { is_error: true, .. }));
        assert_eq!(err.role, Role::Tool);
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::tool_result("toolu_1", "ok");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["content"]["type"], "tool_result");
        assert_eq!(value["content"]["tool_use_id"], "toolu_1");
    }
}
