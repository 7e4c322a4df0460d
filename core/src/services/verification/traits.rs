//! Traits for verification provider and session store integration

use async_trait::async_trait;

use crate::domain::entities::Session;

use super::types::{ProviderReply, VerifyRequest};

/// Trait for verification provider integration
///
/// `Err` is reserved for transport failures; a provider that answered with an
/// error status returns `Ok` with [`ProviderReply::error`] set.
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    /// Start a verification and send a PIN to the number
    async fn request(&self, request: &VerifyRequest) -> Result<ProviderReply, String>;
    /// Check a PIN against a pending request
    async fn check(&self, request_id: &str, pin: &str) -> Result<ProviderReply, String>;
}

/// Trait for session store integration
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session; unknown, expired or absent ids yield a fresh empty session
    async fn load(&self, session_id: Option<&str>) -> Result<Session, String>;
    /// Persist a session for `session.options.max_age` seconds
    async fn save(&self, session: &Session) -> Result<(), String>;
}
