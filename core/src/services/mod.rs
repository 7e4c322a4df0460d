//! Business services containing the verification use cases.

pub mod flow;
pub mod verification;

// Re-export commonly used types
pub use flow::{CheckVerificationResult, StartVerificationResult, VerificationFlow};
pub use verification::{
    status, CheckOutcome, ProviderErrorBody, ProviderReply, SessionStore,
    VerificationOrchestrator, VerificationProvider, VerificationServiceConfig, VerifyOutcome,
    VerifyRequest,
};
