//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain/application types where
//! appropriate.

mod logging;
mod output;
mod providers;
mod run;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig};
pub use run::FileRunConfig;

use curlgen_domain::util::mask_secret;
use serde::{Deserialize, Serialize};

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub field: &'static str,
    pub message: String,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Loop control
    pub run: FileRunConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.run.max_turns == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "run.max_turns",
                message: "run.max_turns must be at least 1".to_string(),
            });
        }
        if self.run.provider_timeout_secs == Some(0) {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                field: "run.provider_timeout_secs",
                message: "run.provider_timeout_secs is 0; every provider call will time out"
                    .to_string(),
            });
        }
        if self.run.command_timeout_secs == Some(0) {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                field: "run.command_timeout_secs",
                message: "run.command_timeout_secs is 0; every command will time out".to_string(),
            });
        }
        if self.providers.openai.base_url.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "providers.openai.base_url",
                message: "providers.openai.base_url cannot be empty".to_string(),
            });
        }
        if self.providers.anthropic.base_url.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "providers.anthropic.base_url",
                message: "providers.anthropic.base_url cannot be empty".to_string(),
            });
        }
        if self.providers.anthropic.max_tokens == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "providers.anthropic.max_tokens",
                message: "providers.anthropic.max_tokens must be at least 1".to_string(),
            });
        }
        if self.providers.openai.api_key.is_some() || self.providers.anthropic.api_key.is_some() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                field: "providers.*.api_key",
                message: "API key stored in a config file; prefer the api_key_env variable"
                    .to_string(),
            });
        }

        issues
    }

    /// Copy with inline API keys masked, for display.
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.providers.openai.api_key = config.providers.openai.api_key.map(|k| mask_secret(&k));
        config.providers.anthropic.api_key =
            config.providers.anthropic.api_key.map(|k| mask_secret(&k));
        config
    }

    /// Render as TOML, inline API keys masked.
    pub fn to_masked_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.masked())
    }

    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
