//! Conversation domain.
//!
//! - [`entities::Message`]: a single turn in the append-only history
//! - [`response::LlmResponse`]: a provider reply normalized into content blocks

pub mod entities;
pub mod response;
