//! # PhoneVerify Core
//!
//! Core business logic and domain layer for the PhoneVerify service.
//! This crate contains the session entity, validated value objects, the
//! provider-facing verification orchestrator, the session-aware flow and
//! the error types shared by the infrastructure and API layers.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
