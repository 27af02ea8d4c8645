//! Domain layer for curlgen
//!
//! This crate contains the core entities and value objects of the
//! curl-generation loop. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Provider models
//!
//! A [`ProviderModel`] pairs a user-facing model name with the canonical id
//! sent over the wire and the protocol family ([`ProviderKind`]) that serves it.
//!
//! ## Conversation
//!
//! The loop keeps an append-only history of [`Message`]s. Provider replies are
//! normalized into an [`LlmResponse`] made of [`ContentBlock`]s, so both
//! protocol families look the same to the driver.
//!
//! ## Proposed commands and the ledger
//!
//! The model answers through a single tool whose arguments are a batch of
//! [`ProposedCommand`]s. Each command produces a [`CommandOutcome`], and the
//! outcomes are accumulated in a [`RunLedger`] for the final report.

pub mod config;
pub mod core;
pub mod ledger;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    model::{ProviderKind, ProviderModel, anthropic_catalog},
};
pub use ledger::{FailedCommand, RunLedger};
pub use prompt::{TaskPrompt, render_command, render_template};
pub use session::{
    entities::{Message, MessageContent, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{
    command::{CommandBatch, ProposedCommand},
    definition::{PROPOSE_COMMANDS_TOOL, ToolDefinition, inline_tool_instruction, propose_commands_tool},
    outcome::{CommandOutcome, ExecutionOutcome, split_status_code},
};
