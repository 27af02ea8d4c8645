//! Infrastructure layer for curlgen
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP model providers, the shell command
//! runner, the JSONL transcript, input loading, and configuration files.

pub mod config;
pub mod context;
pub mod logging;
pub mod process;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigEditError, ConfigEditor, ConfigIssue, ConfigLoader, FileAnthropicConfig, FileConfig, FileLoggingConfig,
    FileOpenAiConfig, FileOutputConfig, FileProvidersConfig, FileRunConfig, Severity,
};
pub use context::{InputError, LocalInputLoader, PromptSources};
pub use logging::JsonlConversationLogger;
pub use process::ShellCommandRunner;
pub use providers::{AnthropicProvider, OpenAiProvider};
