//! Configuration for the verification orchestrator

use pv_shared::config::{ProviderConfig, SessionConfig};

/// Fixed parameters sent with every verification request
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Brand name shown in the SMS text
    pub brand: String,
    /// Seconds the PIN stays valid; matches the session max-age
    pub pin_expiry_seconds: u64,
    /// Language of the SMS text
    pub language: String,
    /// Provider workflow (6 = one SMS, no voice fallback)
    pub workflow_id: u8,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            brand: "vonage-go-sample".to_string(),
            pin_expiry_seconds: 120,
            language: "ja-jp".to_string(),
            workflow_id: 6,
        }
    }
}

impl VerificationServiceConfig {
    /// Derive the request parameters from the application configuration
    pub fn from_app_config(provider: &ProviderConfig, session: &SessionConfig) -> Self {
        Self {
            brand: provider.brand.clone(),
            pin_expiry_seconds: session.max_age,
            language: provider.language.clone(),
            workflow_id: provider.workflow_id,
        }
    }
}
