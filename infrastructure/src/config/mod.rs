//! Configuration file loading for curlgen
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `CURLGEN_*` (nested keys separated by `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./curlgen.toml` or `./.curlgen.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/curlgen/config.toml`
//! 5. Default values

mod editor;
mod file_config;
mod loader;

pub use editor::{ConfigEditError, ConfigEditor, SETTABLE_KEYS, display_value};

pub use file_config::{
    ConfigIssue, FileAnthropicConfig, FileConfig, FileLoggingConfig, FileOpenAiConfig,
    FileOutputConfig, FileProvidersConfig, FileRunConfig, Severity,
};
pub use loader::ConfigLoader;
