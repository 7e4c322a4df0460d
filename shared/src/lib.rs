//! Shared utilities and configuration for PhoneVerify
//!
//! This crate provides common functionality used across all server modules:
//! - Phone number and PIN validation
//! - Phone number masking for logs
//! - Configuration types loaded from the environment

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, Environment, ProviderConfig, ProviderKind, ServerConfig,
    SessionBackend, SessionConfig,
};
pub use utils::{phone, validation};
pub use utils::validation::Validator;
