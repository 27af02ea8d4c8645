//! The tool declaration sent to providers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name of the single tool the model can call.
pub const PROPOSE_COMMANDS_TOOL: &str = "generateCurlCommands";

/// Definition of a tool declared to the model
///
/// `input_schema` is a JSON Schema object. Both provider families accept it
/// as-is (`function.parameters` / `input_schema`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// The declaration in the legacy OpenAI `functions` shape
    /// (`{name, description, parameters}`), used when inlining the schema.
    pub fn to_function_schema(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.input_schema,
        })
    }
}

/// The "propose a batch of curl commands" tool.
pub fn propose_commands_tool() -> ToolDefinition {
    ToolDefinition::new(
        PROPOSE_COMMANDS_TOOL,
        "Generate curl commands for testing an API endpoint",
        json!({
            "type": "object",
            "properties": {
                "commands": {
                    "type": "array",
                    "description": "Array of curl commands which covers all the test cases",
                    "items": {
                        "type": "object",
                        "properties": {
                            "command": {
                                "type": "string",
                                "description": "Curl command to test an API endpoint"
                            },
                            "explanation": {
                                "type": "string",
                                "description": "Explanation of the curl command"
                            },
                            "expected_success": {
                                "type": "boolean",
                                "description": "Whether the command is expected to succeed (true) or fail (false)"
                            }
                        },
                        "required": ["command", "explanation", "expected_success"]
                    }
                }
            },
            "required": ["commands"]
        }),
    )
}

/// First user turn for models that reject tool declarations: the schema is
/// described in text instead.
pub fn inline_tool_instruction(prompt: &str, tool: &ToolDefinition) -> String {
    format!(
        "{}, your response should be an array of curl commands which should follow the schema: {}",
        prompt,
        tool.to_function_schema()
    )
}
