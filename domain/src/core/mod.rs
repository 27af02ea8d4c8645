//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ProviderModel`]: a resolvable model and the protocol family serving it
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
