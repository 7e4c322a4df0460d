//! Verification orchestrator for provider-backed phone verification
//!
//! This module drives the two-phase provider protocol:
//! - starting a verification for a phone number
//! - checking a PIN against a pending request id
//! - translating provider replies into typed outcomes
//!
//! Persisting the outcome into the session is the job of
//! [`crate::services::flow::VerificationFlow`].

mod config;
mod service;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use service::VerificationOrchestrator;
pub use traits::{SessionStore, VerificationProvider};
pub use types::{
    status, CheckOutcome, ProviderErrorBody, ProviderReply, VerifyOutcome, VerifyRequest,
};
