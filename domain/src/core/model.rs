//! Provider model value objects

use serde::{Deserialize, Serialize};

/// Protocol family a model is served by (Value Object)
///
/// The two families differ in how tool calls and tool results are encoded,
/// and in which stop signal means "the model wants a tool".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Chat completions with function calling (`finish_reason == "tool_calls"`).
    #[serde(rename = "openai")]
    OpenAiStyle,
    /// Messages with tool-use content blocks (`stop_reason == "tool_use"`).
    #[serde(rename = "anthropic")]
    AnthropicStyle,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAiStyle => "openai",
            ProviderKind::AnthropicStyle => "anthropic",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Model id prefixes of reasoning-only models that reject tool declarations.
const TOOLLESS_PREFIXES: &[&str] = &["o1"];

/// Static Anthropic-style catalog: display name → API model id.
const ANTHROPIC_MODELS: &[(&str, &str)] = &[
    ("claude-3.5-sonnet", "claude-3-5-sonnet-20240620"),
    ("claude-3-opus", "claude-3-opus-20240229"),
    ("claude-3-sonnet", "claude-3-sonnet-20240229"),
    ("claude-3-haiku", "claude-3-haiku-20240307"),
];

/// A model that a run can be pointed at (Value Object)
///
/// Immutable once built. The `display_name` is what users type, the
/// `canonical_id` is what goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderModel {
    canonical_id: String,
    display_name: String,
    kind: ProviderKind,
}

impl ProviderModel {
    pub fn new(
        canonical_id: impl Into<String>,
        display_name: impl Into<String>,
        kind: ProviderKind,
    ) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            display_name: display_name.into(),
            kind,
        }
    }

    /// An OpenAI-style model; the listing only exposes ids, so both names match.
    pub fn openai(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, ProviderKind::OpenAiStyle)
    }

    pub fn anthropic(display_name: impl Into<String>, canonical_id: impl Into<String>) -> Self {
        Self::new(canonical_id, display_name, ProviderKind::AnthropicStyle)
    }

    pub fn canonical_id(&self) -> &str {
        &self.canonical_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// True if `name` is either the display name or the API id.
    pub fn matches(&self, name: &str) -> bool {
        self.display_name == name || self.canonical_id == name
    }

    /// Reasoning-only models get the tool schema inlined into the prompt
    /// instead of a tool declaration.
    pub fn rejects_tool_declarations(&self) -> bool {
        TOOLLESS_PREFIXES
            .iter()
            .any(|prefix| self.canonical_id.starts_with(prefix))
    }
}

impl std::fmt::Display for ProviderModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.display_name == self.canonical_id {
            write!(f, "{}", self.canonical_id)
        } else {
            write!(f, "{} ({})", self.display_name, self.canonical_id)
        }
    }
}

/// The built-in Anthropic-style catalog.
pub fn anthropic_catalog() -> Vec<ProviderModel> {
    ANTHROPIC_MODELS
        .iter()
        .map(|(display, canonical)| ProviderModel::anthropic(*display, *canonical))
        .collect()
}
