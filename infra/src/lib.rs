//! # Infrastructure Layer
//!
//! Concrete implementations of the seams declared in `pv_core`:
//!
//! - **Verify**: the Vonage Verify HTTP client and an in-process mock provider
//!   implementing [`pv_core::services::VerificationProvider`]
//! - **Session**: in-memory and Redis session stores implementing
//!   [`pv_core::services::SessionStore`]
//!
//! ## Features
//!
//! - `redis-cache`: Enable the Redis session store (default)

// Re-export core types for convenience
pub use pv_core::errors::*;

/// Verification provider clients
pub mod verify;

/// Session store implementations
pub mod session;

pub use session::MemorySessionStore;
#[cfg(feature = "redis-cache")]
pub use session::RedisSessionStore;
pub use verify::{MockVerifyProvider, VonageConfig, VonageVerifyClient, DEFAULT_MOCK_PIN};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis session store error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for the verification provider
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
