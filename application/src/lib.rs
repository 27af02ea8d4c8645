//! Application layer for curlgen
//!
//! This crate contains the conversation driver, the command executor, the
//! provider registry, and the port definitions adapters implement.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunParams;
pub use ports::{
    command_runner::{CommandError, CommandOutput, CommandRunner},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CompletionRequest, GatewayError, LlmProvider, ModelCatalog},
    progress::{NoProgress, RunProgressNotifier},
};
pub use registry::{ModelListing, ProviderRegistry, RegistryError, ResolvedModel};
pub use use_cases::execute_command::{CommandExecutor, Target};
pub use use_cases::generate_commands::{
    GenerateCommandsInput, GenerateCommandsOutput, GenerateCommandsUseCase, RunError, Termination,
};
