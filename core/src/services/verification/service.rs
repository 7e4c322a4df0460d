//! Verification orchestrator implementation

use std::sync::Arc;

use crate::domain::value_objects::{PhoneNumber, Pin};
use crate::errors::{DomainError, DomainResult, SessionError};

use super::config::VerificationServiceConfig;
use super::traits::VerificationProvider;
use super::types::{status, CheckOutcome, VerifyOutcome, VerifyRequest};

/// Drives the start/check protocol against a verification provider
///
/// The orchestrator holds no mutable state. Each call performs exactly one
/// provider request and never retries.
pub struct VerificationOrchestrator<P: VerificationProvider> {
    /// Provider used for both phases
    provider: Arc<P>,
    /// Fixed request parameters
    config: VerificationServiceConfig,
}

impl<P: VerificationProvider> VerificationOrchestrator<P> {
    /// Create a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `provider` - Verification provider implementation
    /// * `config` - Request parameters sent with every verification
    pub fn new(provider: Arc<P>, config: VerificationServiceConfig) -> Self {
        Self { provider, config }
    }

    /// Start a verification for a validated phone number
    ///
    /// An error body carrying a request id means the provider already has a
    /// verification in flight for this number. That request is reattached to
    /// instead of failing, so a second start never creates a second flow.
    pub async fn start_verification(&self, phone: &PhoneNumber) -> VerifyOutcome {
        let request = VerifyRequest {
            number: phone.as_str().to_string(),
            brand: self.config.brand.clone(),
            pin_expiry: self.config.pin_expiry_seconds,
            language: self.config.language.clone(),
            workflow_id: self.config.workflow_id,
        };

        let reply = match self.provider.request(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    phone = %phone.masked(),
                    error = %e,
                    event = "verify_request_transport_failed",
                    "Verification provider request failed"
                );
                return VerifyOutcome::ProviderError {
                    status: None,
                    detail: e,
                };
            }
        };

        match reply.error {
            Some(body) if !body.request_id.is_empty() => {
                tracing::info!(
                    phone = %phone.masked(),
                    status = %body.status,
                    event = "verify_request_reattached",
                    "Verification already in progress, reusing request id"
                );
                VerifyOutcome::AlreadyInProgress {
                    request_id: body.request_id,
                }
            }
            Some(body) if status::is_number_decline(&body.status) => {
                tracing::warn!(
                    phone = %phone.masked(),
                    status = %body.status,
                    event = "verify_request_rejected",
                    "Verification provider declined the number"
                );
                VerifyOutcome::Rejected {
                    status: body.status,
                    detail: body.error_text,
                }
            }
            Some(body) => {
                tracing::error!(
                    phone = %phone.masked(),
                    status = %body.status,
                    detail = %body.error_text,
                    event = "verify_request_failed",
                    "Verification provider returned an error"
                );
                VerifyOutcome::ProviderError {
                    status: Some(body.status),
                    detail: body.error_text,
                }
            }
            None => match reply.request_id.filter(|id| !id.is_empty()) {
                Some(request_id) => {
                    tracing::info!(
                        phone = %phone.masked(),
                        event = "verify_request_started",
                        "Verification started"
                    );
                    VerifyOutcome::Started { request_id }
                }
                None => VerifyOutcome::ProviderError {
                    status: Some(status::SUCCESS.to_string()),
                    detail: "provider returned no request id".to_string(),
                },
            },
        }
    }

    /// Check a validated PIN against a pending request id
    ///
    /// # Returns
    ///
    /// * `Ok(CheckOutcome)` - Verified, rejected, or a fatal provider error
    /// * `Err(DomainError::Session)` - If `request_id` is empty; no provider call is made
    /// * `Err(DomainError::ProviderConflict)` - If another request is in flight;
    ///   nothing happened and the check may be retried
    pub async fn check_verification(
        &self,
        request_id: &str,
        pin: &Pin,
    ) -> DomainResult<CheckOutcome> {
        if request_id.is_empty() {
            return Err(SessionError::InvalidRequestId.into());
        }

        let reply = match self.provider.check(request_id, pin.as_str()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event = "verify_check_transport_failed",
                    "Verification provider check failed"
                );
                return Ok(CheckOutcome::ProviderError {
                    status: None,
                    detail: e,
                });
            }
        };

        let Some(body) = reply.error else {
            tracing::info!(event = "verify_check_success", "PIN verified");
            return Ok(CheckOutcome::Verified);
        };

        if status::is_pin_decline(&body.status) {
            tracing::warn!(
                status = %body.status,
                event = "verify_check_rejected",
                "Verification provider declined the PIN"
            );
            return Ok(CheckOutcome::Rejected {
                status: body.status,
                detail: body.error_text,
            });
        }

        if !body.request_id.is_empty() {
            tracing::warn!(
                status = %body.status,
                event = "verify_check_conflict",
                "Verification check conflicts with an in-flight request"
            );
            return Err(DomainError::ProviderConflict {
                request_id: body.request_id,
            });
        }

        tracing::error!(
            status = %body.status,
            detail = %body.error_text,
            event = "verify_check_failed",
            "Verification provider returned an error"
        );
        Ok(CheckOutcome::ProviderError {
            status: Some(body.status),
            detail: body.error_text,
        })
    }
}
