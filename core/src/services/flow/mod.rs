//! Session-aware verification flow
//!
//! Couples the orchestrator with a session store: validates raw form input,
//! runs one orchestrator phase and applies the resulting session mutation.

mod service;

#[cfg(test)]
mod tests;

pub use service::{CheckVerificationResult, StartVerificationResult, VerificationFlow};
