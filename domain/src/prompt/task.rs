//! The opening prompt of a run.

use super::template::render_template;
use crate::core::error::DomainError;

const BASE_PROMPT: &str = r#"You are an expert API tester. Your task is to generate curl commands for testing an API endpoint based on the following information:

Generate appropriate curl commands for testing the API endpoint based on the following information:

Task Definition:{{taskContent}}
Updated Code: {{filesContent}}
Api Gateway Schema: {{apiGatewaySchema}}
Examples: {{examplesContent}}
Additional Information: {{additionalInfo}}
Requires Login: {{requiresLogin}}

Consider the following when generating curl commands:

1. Use the API Gateway Request Model to structure the request body (if provided).
2. Incorporate any authentication or headers required by the API.
3. Include examples for different HTTP methods (GET, POST, PUT, DELETE) if applicable.
4. Provide variations of the curl commands to test different scenarios or edge cases.
5. Include any necessary query parameters or path variables.
6. Use the placeholder {{API_URL}} for the API URL.
7. Use the placeholder {{API_KEY}} for the API Key or Authorization Header if the curl requires login.

Generate and run a set of curl commands that thoroughly test the API endpoint described above, using the placeholders for API URL and API Key."#;

/// Inputs of the opening prompt (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPrompt {
    pub task: String,
    pub files: String,
    pub api_gateway_schema: String,
    pub examples: String,
    pub additional_info: String,
    pub requires_login: bool,
}

impl TaskPrompt {
    pub fn new(task: impl Into<String>, files: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            files: files.into(),
            ..Default::default()
        }
    }

    pub fn with_api_gateway_schema(mut self, schema: impl Into<String>) -> Self {
        self.api_gateway_schema = schema.into();
        self
    }

    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = examples.into();
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = info.into();
        self
    }

    pub fn with_requires_login(mut self, requires_login: bool) -> Self {
        self.requires_login = requires_login;
        self
    }

    /// Render the prompt. `{{API_URL}}` and `{{API_KEY}}` are left for the model.
    pub fn render(&self) -> Result<String, DomainError> {
        let requires_login = self.requires_login.to_string();
        render_template(
            BASE_PROMPT,
            &[
                ("taskContent", &self.task),
                ("filesContent", &self.files),
                ("apiGatewaySchema", &self.api_gateway_schema),
                ("examplesContent", &self.examples),
                ("additionalInfo", &self.additional_info),
                ("requiresLogin", &requires_login),
            ],
        )
    }
}
