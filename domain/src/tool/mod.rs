//! Tool domain module
//!
//! The loop exposes exactly one tool to the model: a request to propose a
//! batch of curl commands. This module holds its definition, the parsed
//! payload, and the outcome of running each proposed command.
//!
//! ```text
//! ┌────────────────┐    ┌──────────────────┐    ┌────────────────┐
//! │ ToolDefinition │───▶│ ProposedCommand  │───▶│ CommandOutcome │
//! │ (declared)     │    │ (parsed args)    │    │ (per command)  │
//! └────────────────┘    └──────────────────┘    └────────────────┘
//! ```

pub mod command;
pub mod definition;
pub mod outcome;

pub use command::{CommandBatch, ProposedCommand};
pub use definition::{PROPOSE_COMMANDS_TOOL, ToolDefinition, propose_commands_tool};
pub use outcome::{CommandOutcome, ExecutionOutcome};
