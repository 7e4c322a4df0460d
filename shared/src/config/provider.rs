//! Verification provider configuration

use serde::{Deserialize, Serialize};

use super::{parse_or, require, ConfigError};

/// Which verification provider backs the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Vonage Verify API
    #[default]
    Vonage,
    /// In-process provider that logs PINs instead of sending them
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vonage" => Ok(ProviderKind::Vonage),
            "mock" => Ok(ProviderKind::Mock),
            _ => Err(format!("Invalid verification provider: {}", s)),
        }
    }
}

/// Verification provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider implementation
    pub kind: ProviderKind,
    /// API key
    pub api_key: String,
    /// API secret
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// Base URL of the Verify API
    pub base_url: String,
    /// Brand name shown in the SMS
    pub brand: String,
    /// Language of the SMS text
    pub language: String,
    /// Vonage workflow id (6 = single SMS)
    pub workflow_id: u8,
    /// Timeout for provider requests in seconds
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Vonage,
            api_key: String::new(),
            api_secret: String::new(),
            base_url: String::from("https://api.nexmo.com"),
            brand: String::from("vonage-go-sample"),
            language: String::from("ja-jp"),
            workflow_id: 6,
            request_timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    /// Load the provider settings
    ///
    /// `VONAGE_API_KEY` and `VONAGE_API_SECRET` are required for the Vonage provider.
    pub fn from_source<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let kind = match lookup("VERIFY_PROVIDER") {
            Some(value) => value.parse().map_err(|message| ConfigError::Invalid {
                key: "VERIFY_PROVIDER".to_string(),
                message,
            })?,
            None => defaults.kind,
        };

        let (api_key, api_secret) = match kind {
            ProviderKind::Vonage => (
                require(lookup, "VONAGE_API_KEY")?,
                require(lookup, "VONAGE_API_SECRET")?,
            ),
            ProviderKind::Mock => (
                lookup("VONAGE_API_KEY").unwrap_or_default(),
                lookup("VONAGE_API_SECRET").unwrap_or_default(),
            ),
        };

        Ok(Self {
            kind,
            api_key,
            api_secret,
            base_url: lookup("VONAGE_BASE_URL").unwrap_or(defaults.base_url),
            brand: lookup("VERIFY_BRAND").unwrap_or(defaults.brand),
            language: lookup("VERIFY_LANGUAGE").unwrap_or(defaults.language),
            workflow_id: parse_or(lookup, "VERIFY_WORKFLOW_ID", defaults.workflow_id)?,
            request_timeout_secs: parse_or(
                lookup,
                "PROVIDER_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        })
    }
}
