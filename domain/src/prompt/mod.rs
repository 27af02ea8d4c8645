//! Prompt domain
//!
//! Placeholder rendering for prompts and commands, and the task prompt that
//! opens every conversation.

mod task;
mod template;

pub use task::TaskPrompt;
pub use template::{API_KEY_PLACEHOLDER, API_URL_PLACEHOLDER, render_command, render_template};
