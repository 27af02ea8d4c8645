//! Console output for run reports and model listings

use colored::Colorize;
use curlgen_application::{GenerateCommandsOutput, ModelListing};
use curlgen_domain::RunLedger;
use serde_json::json;

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors off (or back to terminal detection).
    pub fn set_color(enabled: bool) {
        if enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// The pass/fail report printed after every run, complete or not.
    pub fn format_report(ledger: &RunLedger) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n",
            "Successful curls (met expectations):".green().bold()
        ));
        for (i, command) in ledger.successful().iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, command));
        }

        output.push_str(&format!(
            "\n{}\n",
            "Failed curls (did not meet expectations):".red().bold()
        ));
        for (i, failed) in ledger.failed().iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, failed.command));
            output.push_str(&format!("   Reason: {}\n", failed.reason));
        }

        output
    }

    /// The model's closing text, printed under the report. Empty when the
    /// model said nothing in its last turn.
    pub fn format_final_text(final_text: &str) -> String {
        let text = final_text.trim();
        if text.is_empty() {
            return String::new();
        }
        format!("\n{}\n{}\n", "Model summary:".cyan().bold(), text)
    }

    /// JSON report. `run` is `None` when the run aborted.
    pub fn format_json(ledger: &RunLedger, run: Option<&GenerateCommandsOutput>) -> String {
        let value = json!({
            "model": run.map(|r| r.model_id.as_str()),
            "termination": run.map(|r| r.termination.as_str()),
            "turns": run.map(|r| r.turns),
            "final_text": run.map(|r| r.final_text.as_str()),
            "successful": ledger.successful(),
            "failed": ledger.failed(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Both model catalogs, one model per line.
    pub fn format_models(listing: &ModelListing) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "OpenAI models:".cyan().bold()));
        if listing.openai.is_empty() {
            output.push_str(&format!("  {}\n", "(none, OpenAI provider not configured)".dimmed()));
        }
        for model in &listing.openai {
            output.push_str(&format!("  {}\n", model));
        }

        output.push_str(&format!("\n{}\n", "Anthropic models:".cyan().bold()));
        for model in &listing.anthropic {
            output.push_str(&format!("  {}\n", model));
        }

        output
    }

    /// Banner around the rendered prompt for `--show-prompt`.
    pub fn format_prompt(prompt: &str) -> String {
        format!(
            "{}\n{}\n{}\n",
            "──── Prompt ────".cyan().bold(),
            prompt,
            "────────────────".cyan().bold()
        )
    }
}
