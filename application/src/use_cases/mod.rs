//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_command;
pub mod generate_commands;
pub(crate) mod shared;
