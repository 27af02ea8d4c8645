//! Process adapters: running rendered commands through the shell.

mod shell_runner;

pub use shell_runner::ShellCommandRunner;
