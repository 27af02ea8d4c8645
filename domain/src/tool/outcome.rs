//! Outcome of running one proposed command.

use serde::{Deserialize, Serialize};

/// Split curl output produced with `-w "%{http_code}"` into body and status.
///
/// The status code is the last three characters of stdout; everything before
/// it is the response body. The status is `None` when those characters are
/// not a number. Curl prints `000` when it never got a response, which parses
/// as `Some(0)` and is classified as a failure.
pub fn split_status_code(stdout: &str) -> (&str, Option<u16>) {
    let trimmed = stdout.trim_end();
    let split_at = trimmed
        .char_indices()
        .rev()
        .nth(2)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let (body, code) = trimmed.split_at(split_at);
    (body, code.parse().ok())
}

/// Result of actually executing a rendered command (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub rendered_command: String,
    pub http_status: Option<u16>,
    pub exit_code: Option<i32>,
    /// Response body (stdout without the trailing status code).
    pub body: String,
    pub stderr: String,
    pub expected_success: bool,
    pub actual_success: bool,
}

impl ExecutionOutcome {
    /// Classify a finished process.
    ///
    /// A command succeeded when it exited with 0 and the HTTP status is in
    /// `200..400`.
    pub fn from_process(
        rendered_command: impl Into<String>,
        expected_success: bool,
        exit_code: Option<i32>,
        stdout: &str,
        stderr: impl Into<String>,
    ) -> Self {
        let (body, http_status) = split_status_code(stdout);
        let actual_success =
            exit_code == Some(0) && http_status.is_some_and(|s| (200..400).contains(&s));
        Self {
            rendered_command: rendered_command.into(),
            http_status,
            exit_code,
            body: body.to_string(),
            stderr: stderr.into(),
            expected_success,
            actual_success,
        }
    }

    pub fn matched_expectation(&self) -> bool {
        self.actual_success == self.expected_success
    }

    pub fn status_display(&self) -> String {
        self.http_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Ledger reason for an expectation mismatch.
    pub fn mismatch_reason(&self) -> String {
        format!(
            "Expected success: {}, http code:{}, Actual success: {}",
            self.expected_success,
            self.status_display(),
            self.actual_success
        )
    }
}

/// What happened to one proposed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran to completion.
    Executed(ExecutionOutcome),
    /// Dry run: the command was rendered but not spawned.
    DryRun { rendered_command: String },
    /// Placeholder substitution failed; nothing was run.
    RenderFailed { command: String, reason: String },
    /// The process could not be spawned or waited on.
    SpawnFailed {
        rendered_command: String,
        reason: String,
    },
}

impl CommandOutcome {
    /// The line reported back to the model for this command.
    pub fn summary_line(&self) -> String {
        match self {
            CommandOutcome::Executed(outcome) => format!(
                "The curl command: {} returned HTTP status {} with the following output: {}",
                outcome.rendered_command,
                outcome.status_display(),
                outcome.body
            ),
            CommandOutcome::DryRun { rendered_command } => rendered_command.clone(),
            CommandOutcome::RenderFailed { command, reason } => {
                format!("Failed to render curl command: {}. Error: {}", command, reason)
            }
            CommandOutcome::SpawnFailed {
                rendered_command,
                reason,
            } => format!(
                "Failed to execute curl command: {}. Error: {}",
                rendered_command, reason
            ),
        }
    }

    /// Whether the outcome counts as meeting the model's expectation.
    pub fn met_expectation(&self) -> bool {
        match self {
            CommandOutcome::Executed(outcome) => outcome.matched_expectation(),
            CommandOutcome::DryRun { .. } => true,
            CommandOutcome::RenderFailed { .. } | CommandOutcome::SpawnFailed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_status_code() {
        assert_eq!(split_status_code(r#"{"ok":true}200"#), (r#"{"ok":true}"#, Some(200)));
        assert_eq!(split_status_code("404"), ("", Some(404)));
        assert_eq!(split_status_code("000"), ("", Some(0)));
        assert_eq!(split_status_code("body\n201\n"), ("body\n", Some(201)));
        assert_eq!(split_status_code("oops"), ("o", None));
        assert_eq!(split_status_code(""), ("", None));
    }

    #[test]
    fn test_split_status_code_multibyte_body() {
        assert_eq!(split_status_code("héllo200"), ("héllo", Some(200)));
    }

    #[test]
    fn test_expected_success_with_200_matches() {
        let outcome = ExecutionOutcome::from_process("curl x", true, Some(0), "[]200", "");
        assert!(outcome.actual_success);
        assert!(outcome.matched_expectation());
        assert_eq!(outcome.body, "[]");
    }

    #[test]
    fn test_expected_failure_with_404_matches() {
        let outcome = ExecutionOutcome::from_process("curl x", false, Some(0), "not found404", "");
        assert!(!outcome.actual_success);
        assert!(outcome.matched_expectation());
    }

    #[test]
    fn test_redirect_counts_as_success() {
        let outcome = ExecutionOutcome::from_process("curl x", true, Some(0), "302", "");
        assert!(outcome.actual_success);
    }

    #[test]
    fn test_nonzero_exit_is_failure_even_with_200() {
        let outcome = ExecutionOutcome::from_process("curl x", true, Some(6), "200", "");
        assert!(!outcome.actual_success);
    }

    #[test]
    fn test_mismatch_reason_contains_both_classifications() {
        let outcome = ExecutionOutcome::from_process("curl x", true, Some(0), "boom500", "");
        assert!(!outcome.matched_expectation());
        assert_eq!(
            outcome.mismatch_reason(),
            "Expected success: true, http code:500, Actual success: false"
        );
    }

    #[test]
    fn test_summary_lines() {
        let executed = CommandOutcome::Executed(ExecutionOutcome::from_process(
            "curl http://h/a",
            true,
            Some(0),
            "{}200",
            "",
        ));
        assert_eq!(
            executed.summary_line(),
            "The curl command: curl http://h/a returned HTTP status 200 with the following output: {}"
        );

        let dry = CommandOutcome::DryRun {
            rendered_command: "curl http://h/a".to_string(),
        };
        assert_eq!(dry.summary_line(), "curl http://h/a");
        assert!(dry.met_expectation());

        let spawn = CommandOutcome::SpawnFailed {
            rendered_command: "curl http://h/a".to_string(),
            reason: "No such file".to_string(),
        };
        assert_eq!(
            spawn.summary_line(),
            "Failed to execute curl command: curl http://h/a. Error: No such file"
        );
        assert!(!spawn.met_expectation());
    }
}
