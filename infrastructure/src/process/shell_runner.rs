//! `sh -c` implementation of the [`CommandRunner`] port.

use async_trait::async_trait;
use curlgen_application::ports::command_runner::{CommandError, CommandOutput, CommandRunner};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Maximum captured size per stream (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

fn capture(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= MAX_OUTPUT_SIZE {
        return text.into_owned();
    }
    // Keep the tail: curl's write-out lands at the end of stdout.
    let mut start = text.len() - MAX_OUTPUT_SIZE;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

/// Runs commands with `sh -c`, capturing stdout and stderr
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }
}

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different POSIX shell (must accept `-c`).
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(
        &self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, CommandError> {
        debug!("Spawning: {} -c {}", self.shell, command);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let child = cmd
            .spawn()
            .map_err(|e| CommandError::Spawn(e.to_string()))?;

        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| CommandError::Timeout(limit))?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| CommandError::Wait(e.to_string()))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: capture(&output.stdout),
            stderr: capture(&output.stderr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let output = ShellCommandRunner::new()
            .run("echo hello", None)
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let output = ShellCommandRunner::new()
            .run("echo oops >&2; exit 7", None)
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(7));
        assert_eq!(output.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_write_out_style_output() {
        let output = ShellCommandRunner::new()
            .run(r#"printf '{"ok":true}' ; printf "%s" "200""#, None)
            .await
            .unwrap();
        assert_eq!(output.stdout, r#"{"ok":true}200"#);
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = ShellCommandRunner::new()
            .run("sleep 5", Some(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert_eq!(err, CommandError::Timeout(Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_error() {
        let err = ShellCommandRunner::new()
            .with_shell("/nonexistent/shell")
            .run("true", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn(_)));
    }

    #[test]
    fn test_capture_keeps_tail() {
        let mut big = "a".repeat(MAX_OUTPUT_SIZE + 10);
        big.push_str("200");
        let captured = capture(big.as_bytes());
        assert_eq!(captured.len(), MAX_OUTPUT_SIZE);
        assert!(captured.ends_with("200"));
    }
}
