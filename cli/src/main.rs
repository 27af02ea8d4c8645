//! CLI entrypoint for curlgen
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use curlgen_application::{
    ConversationLogger, GenerateCommandsInput, GenerateCommandsUseCase, NoConversationLogger,
    NoProgress, ProviderRegistry, RunParams, RunProgressNotifier, Target,
};
use curlgen_domain::{OutputFormat, RunLedger};
use curlgen_infrastructure::config::display_value;
use curlgen_infrastructure::{
    AnthropicProvider, ConfigEditor, ConfigLoader, FileConfig, JsonlConversationLogger,
    LocalInputLoader, OpenAiProvider, PromptSources, Severity, ShellCommandRunner,
};
use curlgen_presentation::{
    Cli, Command, ConfigAction, ConsoleFormatter, GenerateArgs, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Edits must work even when the current file no longer loads
    if let Some(Command::Config { action }) = &cli.command
        && matches!(action, ConfigAction::Set { .. } | ConfigAction::Reset { .. })
    {
        return edit_global_config(action);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    match cli.command {
        Some(Command::Config { action }) => run_config(action, &config, cli.config.as_deref()),
        Some(Command::ListModels) => list_models(&config).await,
        None => generate(cli.generate, config).await,
    }
}

fn run_config(action: ConfigAction, config: &FileConfig, explicit: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Path => ConfigLoader::print_config_sources(explicit),
        ConfigAction::Show => {
            print!("{}", config.to_masked_toml()?);
            for issue in config.validate() {
                eprintln!("{:?}: {}", issue.severity, issue.message);
            }
        }
        ConfigAction::Set { .. } | ConfigAction::Reset { .. } => return edit_global_config(&action),
    }
    Ok(())
}

fn edit_global_config(action: &ConfigAction) -> Result<()> {
    let editor = ConfigEditor::global()?;
    match action {
        ConfigAction::Set { key, value } => {
            let stored = editor.set(key, value)?;
            info!("Updated {}", editor.path().display());
            println!("{} = {}", key, display_value(key, &stored));
        }
        ConfigAction::Reset { key } => {
            let removed = editor.reset(key.as_deref())?;
            match (key, removed) {
                (Some(key), true) => println!("Reset {}", key),
                (Some(key), false) => println!("{} was not set", key),
                (None, true) => println!("Removed {}", editor.path().display()),
                (None, false) => println!("No global config at {}", editor.path().display()),
            }
        }
        ConfigAction::Show | ConfigAction::Path => {}
    }
    Ok(())
}

/// Register a provider for every family with a resolvable API key.
fn build_registry(config: &FileConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    if let Some(openai) = OpenAiProvider::try_from_config(&config.providers.openai) {
        let openai = Arc::new(openai);
        registry = registry.with_openai(openai.clone(), openai);
    }
    if let Some(anthropic) = AnthropicProvider::try_from_config(&config.providers.anthropic) {
        registry = registry.with_anthropic(Arc::new(anthropic));
    }
    registry
}

async fn list_models(config: &FileConfig) -> Result<()> {
    let listing = build_registry(config).list().await?;
    print!("{}", ConsoleFormatter::format_models(&listing));
    Ok(())
}

async fn generate(args: GenerateArgs, config: FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("Config error: {}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
    if FileConfig::has_errors(&issues) {
        bail!("Invalid configuration");
    }

    let Some(model) = args.model else {
        bail!("Model is required (--model)");
    };

    let format = args
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    ConsoleFormatter::set_color(config.output.color && !args.no_color);

    // === Prompt ===
    let sources = PromptSources {
        task: args.task,
        files: args.files,
        examples: args.examples,
        api_gateway_schema: args.api_gateway_schema,
        additional_info: args.additional_info,
        requires_login: args.requires_login,
    };
    let prompt = LocalInputLoader::new()
        .load(&sources)?
        .render()
        .context("Failed to render the prompt")?;
    if args.show_prompt {
        print!("{}", ConsoleFormatter::format_prompt(&prompt));
    }

    // === Dependency Injection ===
    let registry = Arc::new(build_registry(&config));
    let runner = Arc::new(ShellCommandRunner::new());

    let conversation_logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log
    {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping the run");
            on_interrupt.cancel();
        }
    });

    let use_case = GenerateCommandsUseCase::new(registry, runner)
        .with_conversation_logger(conversation_logger)
        .with_cancellation(cancellation);

    let mut params: RunParams = config.run.to_run_params();
    if let Some(max_turns) = args.max_turns {
        params = params.with_max_turns(max_turns as usize);
    }
    if args.dry_run {
        params = params.dry_run();
    }

    let target = Target::new(
        args.endpoint.unwrap_or_default(),
        args.api_key.unwrap_or_default(),
    );
    let input = GenerateCommandsInput::new(model, prompt, target).with_params(params);

    let progress: Box<dyn RunProgressNotifier> = if args.quiet || format == OutputFormat::Json {
        Box::new(NoProgress)
    } else if std::io::stdout().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress::new())
    };

    // A fresh ledger per run
    let mut ledger = RunLedger::new();
    let result = use_case
        .execute_with_progress(input, &mut ledger, progress.as_ref())
        .await;

    // Resolution failures happen before anything ran; there is no report to print
    if let Err(e) = &result
        && e.is_resolution_error()
    {
        return Err(anyhow!("{}", e));
    }

    match format {
        OutputFormat::Text => {
            print!("{}", ConsoleFormatter::format_report(&ledger));
            if let Ok(output) = &result {
                print!("{}", ConsoleFormatter::format_final_text(&output.final_text));
            }
        }
        OutputFormat::Json => println!(
            "{}",
            ConsoleFormatter::format_json(&ledger, result.as_ref().ok())
        ),
    }

    let output = result?;
    info!(
        "Run finished ({}) after {} turns: {} passed, {} failed",
        output.termination.as_str(),
        output.turns,
        ledger.successful().len(),
        ledger.failed().len()
    );
    Ok(())
}
