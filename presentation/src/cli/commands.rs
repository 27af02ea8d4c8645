//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use curlgen_domain::OutputFormat as ReportFormat;
use std::path::PathBuf;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable report
    Text,
    /// JSON report
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// CLI arguments for curlgen
#[derive(Parser, Debug)]
#[command(name = "curlgen")]
#[command(author, version, about = "Generate, run and grade curl tests for an API with an LLM")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = r#"
curlgen asks a model to propose curl commands that exercise an API, runs
them, and feeds the HTTP status and body back until the model is done.
Each command is graded against the model's own expectation of success.

Commands use the placeholders {{API_URL}} and {{API_KEY}}, which are
replaced with --endpoint and --api-key before running.

Configuration files are loaded from (in priority order):
1. CURLGEN_* environment variables
2. --config <path>     Explicit config file
3. ./curlgen.toml      Project-level config
4. ~/.config/curlgen/config.toml   Global config

Example:
  curlgen -m gpt-4o -t "Test the user routes" -f src/routes/users.ts -e http://localhost:3000
  curlgen -m claude-3-haiku -t file:task.md -f api.ts -a openapi.yaml --dry-run
  curlgen list-models
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore configuration files and environment overrides
    #[arg(long, global = true)]
    pub no_config: bool,
}

/// Arguments for a generation run
#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Model to use (display name or API id)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Task description, or file:<path> to read it from disk
    #[arg(short, long, value_name = "TASK")]
    pub task: Option<String>,

    /// Source files to include in the prompt (can be specified multiple times)
    #[arg(short, long = "files", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Example commands, literal or file:<path>
    #[arg(short = 'x', long, value_name = "EXAMPLES")]
    pub examples: Option<String>,

    /// API gateway schema, literal, file:<path>, or a path
    #[arg(short = 'a', long, value_name = "SCHEMA")]
    pub api_gateway_schema: Option<String>,

    /// API key substituted for {{API_KEY}}
    #[arg(short = 'k', long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Endpoint substituted for {{API_URL}}
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// The API requires logging in before other calls
    #[arg(short, long)]
    pub requires_login: bool,

    /// Extra context passed to the model verbatim
    #[arg(long, value_name = "TEXT")]
    pub additional_info: Option<String>,

    /// Render commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of model turns (at least 1)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_turns: Option<u32>,

    /// Print the rendered prompt before the run
    #[arg(long)]
    pub show_prompt: bool,

    /// Output format for the final report
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the models each provider can serve
    ListModels,
    /// Inspect or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the merged configuration with API keys masked
    Show,
    /// List configuration sources in priority order
    Path,
    /// Set a dotted key (e.g. `run.max_turns`) in the global config file
    Set {
        /// Dotted key
        key: String,
        /// New value; numbers and booleans are stored typed
        value: String,
    },
    /// Remove one key from the global config file, or the whole file
    Reset {
        /// Dotted key; omit to delete the file
        key: Option<String>,
    },
}
