//! Domain entities representing core business objects.

pub mod session;


// Re-export commonly used types
pub use session::{
    FlowState, Session, SessionOptions, SessionValues, VerificationSession, REQUEST_ID_KEY,
    VERIFIED_KEY,
};
