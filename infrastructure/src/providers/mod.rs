//! LLM provider adapters
//!
//! One adapter per protocol family. Each is built from its `[providers]`
//! config section when an API key can be resolved.

pub mod anthropic;
mod http;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use crate::config::{FileAnthropicConfig, FileOpenAiConfig};
use tracing::{debug, info};

impl OpenAiProvider {
    /// Build from config. Returns `None` when no API key is available.
    pub fn try_from_config(config: &FileOpenAiConfig) -> Option<Self> {
        let Some(key) = config.resolve_api_key() else {
            debug!("OpenAI provider not configured ({} unset)", config.api_key_env);
            return None;
        };
        info!(base_url = %config.base_url, "OpenAI provider initialized");
        Some(
            OpenAiProvider::new(key)
                .with_base_url(&config.base_url)
                .with_max_tokens(config.max_tokens),
        )
    }
}

impl AnthropicProvider {
    /// Build from config. Returns `None` when no API key is available.
    pub fn try_from_config(config: &FileAnthropicConfig) -> Option<Self> {
        let Some(key) = config.resolve_api_key() else {
            debug!("Anthropic provider not configured ({} unset)", config.api_key_env);
            return None;
        };
        info!(base_url = %config.base_url, "Anthropic provider initialized");
        Some(
            AnthropicProvider::new(key)
                .with_base_url(&config.base_url)
                .with_api_version(&config.api_version)
                .with_max_tokens(config.max_tokens),
        )
    }
}
