//! Progress reporting for a generation run

use colored::Colorize;
use curlgen_application::{RunProgressNotifier, Termination};
use curlgen_domain::CommandOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner while the model is thinking
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Print a line without tearing the spinner.
    fn println(&self, line: String) {
        let guard = self.spinner.lock().ok();
        match guard.as_ref().and_then(|g| g.as_ref()) {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, turn: usize) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Turn {}", turn));
        pb.set_message("Waiting for the model...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock()
            && let Some(previous) = guard.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_turn_end(&self, _turn: usize) {
        self.clear_spinner();
    }

    fn on_assistant_text(&self, text: &str) {
        self.println(format!("{} {}", "Model:".cyan().bold(), text.trim()));
    }

    fn on_retry(&self, attempt: usize, error: &str) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(format!("Retrying (attempt {}): {}", attempt, error));
        }
    }

    fn on_tool_call_skipped(&self, tool_use_id: &str, reason: &str) {
        self.println(format!(
            "{} Skipped tool call {}: {}",
            "!".yellow().bold(),
            tool_use_id,
            reason
        ));
    }

    fn on_command_start(&self, rendered: &str) {
        self.println(format!("Running: {}", rendered));
    }

    fn on_command_complete(&self, outcome: &CommandOutcome) {
        let line = match outcome {
            CommandOutcome::Executed(result) => {
                let mark = if result.matched_expectation() {
                    "v".green()
                } else {
                    "x".red()
                };
                format!("  {} HTTP {}", mark, result.status_display())
            }
            CommandOutcome::DryRun { .. } => format!("  {} dry run", "-".dimmed()),
            CommandOutcome::RenderFailed { reason, .. } => {
                format!("  {} not rendered: {}", "x".red(), reason)
            }
            CommandOutcome::SpawnFailed { reason, .. } => {
                format!("  {} failed to run: {}", "x".red(), reason)
            }
        };
        self.println(line);
    }

    fn on_finished(&self, termination: Termination) {
        self.clear_spinner();
        match termination {
            Termination::Completed => println!("{}", finish_message(termination).green()),
            _ => println!("{} {}", "!".yellow().bold(), finish_message(termination)),
        }
    }

    fn on_turn_limit(&self, max_turns: usize) {
        self.clear_spinner();
        println!(
            "{} Stopped after {} turns without the model finishing",
            "!".yellow().bold(),
            max_turns
        );
    }
}

/// Line shown when the model ends the conversation.
fn finish_message(termination: Termination) -> &'static str {
    match termination {
        Termination::Completed => "The curl commands have been generated successfully",
        Termination::FinalAnswer => "The model stopped without signalling completion",
        Termination::TurnLimit => "The turn limit was reached",
    }
}

/// Plain line-per-event progress, used when stdout is not a terminal
pub struct SimpleProgress<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for SimpleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> SimpleProgress<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn line(&self, line: String) {
        // Progress output is best-effort; a closed pipe must not end the run.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", line);
        }
    }
}

impl<W: Write + Send> RunProgressNotifier for SimpleProgress<W> {
    fn on_turn_start(&self, turn: usize) {
        self.line(format!("Turn {}: waiting for the model", turn));
    }

    fn on_assistant_text(&self, text: &str) {
        self.line(format!("Model: {}", text.trim()));
    }

    fn on_retry(&self, attempt: usize, error: &str) {
        self.line(format!("Retrying (attempt {}): {}", attempt, error));
    }

    fn on_command_start(&self, rendered: &str) {
        self.line(format!("Running: {}", rendered));
    }

    fn on_command_complete(&self, outcome: &CommandOutcome) {
        let line = match outcome {
            CommandOutcome::Executed(result) => {
                let mark = if result.matched_expectation() {
                    "pass"
                } else {
                    "fail"
                };
                format!("  {} HTTP {}", mark, result.status_display())
            }
            CommandOutcome::DryRun { .. } => "  dry run".to_string(),
            CommandOutcome::RenderFailed { reason, .. } => format!("  not rendered: {}", reason),
            CommandOutcome::SpawnFailed { reason, .. } => format!("  failed to run: {}", reason),
        };
        self.line(line);
    }

    fn on_tool_call_skipped(&self, tool_use_id: &str, reason: &str) {
        self.line(format!("Skipped tool call {}: {}", tool_use_id, reason));
    }

    fn on_finished(&self, termination: Termination) {
        self.line(finish_message(termination).to_string());
    }

    fn on_turn_limit(&self, max_turns: usize) {
        self.line(format!(
            "Stopped after {} turns without the model finishing",
            max_turns
        ));
    }
}
