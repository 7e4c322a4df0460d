//! Vonage Verify API client
//!
//! Implements [`VerificationProvider`] on top of the two Verify endpoints:
//!
//! - `POST {base}/verify/json` starts a verification
//! - `POST {base}/verify/check/json` checks a PIN
//!
//! Both answer with a JSON body carrying a string `status`. Status `"0"` is a
//! success; anything else is turned into a [`ProviderErrorBody`] and left to the
//! orchestrator to classify. Only network failures, non-2xx responses and
//! undecodable bodies are reported as transport errors.

use async_trait::async_trait;
use pv_core::services::verification::status;
use pv_core::services::{ProviderReply, VerificationProvider, VerifyRequest};
use pv_shared::config::ProviderConfig;
use pv_shared::utils::phone::mask_phone_number;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::InfrastructureError;

/// Vonage Verify client configuration
#[derive(Debug, Clone)]
pub struct VonageConfig {
    /// Vonage API key
    pub api_key: String,
    /// Vonage API secret
    pub api_secret: String,
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl From<&ProviderConfig> for VonageConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: config.request_timeout_secs,
        }
    }
}

/// Response body shared by the request and check endpoints
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    request_id: String,
    status: String,
    #[serde(default)]
    error_text: String,
}

impl From<VerifyResponse> for ProviderReply {
    fn from(response: VerifyResponse) -> Self {
        if response.status == status::SUCCESS {
            ProviderReply::success(response.request_id)
        } else {
            ProviderReply::failure(response.status, response.error_text, response.request_id)
        }
    }
}

/// Vonage Verify HTTP client
pub struct VonageVerifyClient {
    client: reqwest::Client,
    config: VonageConfig,
}

impl VonageVerifyClient {
    /// Create a new client
    pub fn new(config: VonageConfig) -> Result<Self, InfrastructureError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(InfrastructureError::Config(
                "Vonage API key and secret are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            base_url = %config.base_url,
            timeout_secs = config.request_timeout_secs,
            "Vonage Verify client initialized"
        );

        Ok(Self { client, config })
    }

    /// Create from the shared provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self, InfrastructureError> {
        Self::new(VonageConfig::from(config))
    }

    async fn post(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ProviderReply, InfrastructureError> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let mut form = vec![
            ("api_key", self.config.api_key.as_str()),
            ("api_secret", self.config.api_secret.as_str()),
        ];
        form.extend_from_slice(params);

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let body: VerifyResponse = response.json().await?;

        debug!(endpoint, status = %body.status, "Vonage Verify replied");
        Ok(body.into())
    }
}

#[async_trait]
impl VerificationProvider for VonageVerifyClient {
    async fn request(&self, request: &VerifyRequest) -> Result<ProviderReply, String> {
        let pin_expiry = request.pin_expiry.to_string();
        let workflow_id = request.workflow_id.to_string();
        let params = [
            ("number", request.number.as_str()),
            ("brand", request.brand.as_str()),
            ("pin_expiry", pin_expiry.as_str()),
            ("lg", request.language.as_str()),
            ("workflow_id", workflow_id.as_str()),
        ];

        self.post("/verify/json", &params).await.map_err(|e| {
            error!(
                phone = %mask_phone_number(&request.number),
                error = %e,
                event = "vonage_request_failed",
                "Vonage verify request failed"
            );
            e.to_string()
        })
    }

    async fn check(&self, request_id: &str, pin: &str) -> Result<ProviderReply, String> {
        let params = [("request_id", request_id), ("code", pin)];

        self.post("/verify/check/json", &params).await.map_err(|e| {
            error!(
                request_id,
                error = %e,
                event = "vonage_check_failed",
                "Vonage verify check failed"
            );
            e.to_string()
        })
    }
}
