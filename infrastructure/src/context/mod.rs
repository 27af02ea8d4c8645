//! Prompt input loading
//!
//! Reads the task, source files, examples, and API gateway schema named on
//! the command line and assembles them into a [`TaskPrompt`].
//!
//! [`TaskPrompt`]: curlgen_domain::TaskPrompt

mod loader;

pub use loader::{InputError, LocalInputLoader, PromptSources};
