//! Provider request/reply types and verification outcomes

use serde::{Deserialize, Serialize};

/// Parameters of a provider "request" call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// E.164 number to verify
    pub number: String,
    pub brand: String,
    /// Seconds the PIN stays valid
    pub pin_expiry: u64,
    pub language: String,
    pub workflow_id: u8,
}

/// Error body returned by the provider alongside a non-zero status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    pub status: String,
    pub error_text: String,
    /// Request id of an in-flight verification, empty when none
    pub request_id: String,
}

/// Reply of a provider call that reached the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReply {
    /// Request id on success
    pub request_id: Option<String>,
    pub error: Option<ProviderErrorBody>,
}

impl ProviderReply {
    pub fn success(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            error: None,
        }
    }

    pub fn failure(
        status: impl Into<String>,
        error_text: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            request_id: None,
            error: Some(ProviderErrorBody {
                status: status.into(),
                error_text: error_text.into(),
                request_id: request_id.into(),
            }),
        }
    }
}

/// Outcome of starting a verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// A new verification was started
    Started { request_id: String },
    /// A verification for this number is already in flight; reattach to it
    AlreadyInProgress { request_id: String },
    /// The provider declined the destination number
    Rejected { status: String, detail: String },
    /// Fatal provider failure; `status` is `None` for transport failures
    ProviderError { status: Option<String>, detail: String },
}

impl VerifyOutcome {
    /// The request id to store in the session, if the flow may continue
    pub fn request_id(&self) -> Option<&str> {
        match self {
            VerifyOutcome::Started { request_id }
            | VerifyOutcome::AlreadyInProgress { request_id } => Some(request_id.as_str()),
            _ => None,
        }
    }
}

/// Outcome of checking a PIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Verified,
    /// The provider declined the PIN
    Rejected { status: String, detail: String },
    /// Fatal provider failure; `status` is `None` for transport failures
    ProviderError { status: Option<String>, detail: String },
}

/// Vonage Verify status codes the orchestrator distinguishes
pub mod status {
    pub const SUCCESS: &str = "0";
    pub const INVALID_PARAMS: &str = "3";
    pub const INVALID_CREDENTIALS: &str = "4";
    pub const UNROUTABLE: &str = "6";
    pub const NUMBER_BARRED: &str = "7";
    pub const CONCURRENT_VERIFICATIONS: &str = "10";
    pub const UNSUPPORTED_NETWORK: &str = "15";
    pub const WRONG_CODE: &str = "16";
    pub const WRONG_CODE_TOO_MANY: &str = "17";
    pub const REQUEST_NOT_FOUND: &str = "101";

    /// Statuses meaning the destination number itself cannot be verified
    pub fn is_number_decline(status: &str) -> bool {
        matches!(status, INVALID_PARAMS | UNROUTABLE | NUMBER_BARRED | UNSUPPORTED_NETWORK)
    }

    /// Statuses meaning the submitted PIN was declined
    pub fn is_pin_decline(status: &str) -> bool {
        matches!(status, WRONG_CODE | WRONG_CODE_TOO_MANY)
    }

    /// PIN declines after which the provider no longer accepts checks
    pub fn ends_request(status: &str) -> bool {
        status == WRONG_CODE_TOO_MANY
    }
}
