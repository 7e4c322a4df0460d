//! Mock verification provider
//!
//! An in-process stand-in for Vonage Verify used in development. It keeps
//! the provider's observable contract:
//!
//! - one pending verification per number (status `10` with the in-flight id)
//! - a fixed PIN, logged instead of sent
//! - wrong PINs answer status `16`, unknown or expired ids status `101`

use async_trait::async_trait;
use pv_core::services::verification::status;
use pv_core::services::{ProviderReply, VerificationProvider, VerifyRequest};
use pv_shared::utils::phone::mask_phone_number;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// PIN accepted by the mock provider unless configured otherwise
pub const DEFAULT_MOCK_PIN: &str = "1234";

#[derive(Debug, Clone)]
struct PendingVerification {
    number: String,
    expires_at: Instant,
}

/// Mock verification provider for development and testing
pub struct MockVerifyProvider {
    pin: String,
    /// request id -> pending verification
    pending: Mutex<HashMap<String, PendingVerification>>,
    /// Counter for tracking number of verifications started
    started: AtomicU64,
}

impl MockVerifyProvider {
    /// Create a mock provider accepting [`DEFAULT_MOCK_PIN`]
    pub fn new() -> Self {
        Self::with_pin(DEFAULT_MOCK_PIN)
    }

    /// Create a mock provider accepting the given PIN
    pub fn with_pin(pin: impl Into<String>) -> Self {
        Self {
            pin: pin.into(),
            pending: Mutex::new(HashMap::new()),
            started: AtomicU64::new(0),
        }
    }

    /// Number of verifications started so far
    pub fn started_count(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    fn lock_pending(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, PendingVerification>>, String> {
        self.pending
            .lock()
            .map_err(|_| "mock provider state poisoned".to_string())
    }
}

impl Default for MockVerifyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationProvider for MockVerifyProvider {
    async fn request(&self, request: &VerifyRequest) -> Result<ProviderReply, String> {
        let now = Instant::now();
        let mut pending = self.lock_pending()?;
        pending.retain(|_, verification| verification.expires_at > now);

        if let Some((request_id, _)) = pending
            .iter()
            .find(|(_, verification)| verification.number == request.number)
        {
            warn!(
                provider = "mock",
                phone = %mask_phone_number(&request.number),
                "Verification already in progress (mock)"
            );
            return Ok(ProviderReply::failure(
                status::CONCURRENT_VERIFICATIONS,
                "Concurrent verifications to the same number are not allowed",
                request_id.clone(),
            ));
        }

        let expires_at = now
            .checked_add(Duration::from_secs(request.pin_expiry))
            .ok_or_else(|| format!("PIN expiry out of range: {}", request.pin_expiry))?;
        let request_id = Uuid::new_v4().simple().to_string();
        pending.insert(
            request_id.clone(),
            PendingVerification {
                number: request.number.clone(),
                expires_at,
            },
        );
        let count = self.started.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "verify_provider",
            provider = "mock",
            phone = %mask_phone_number(&request.number),
            pin = %self.pin,
            count,
            "Verification started (mock)"
        );

        Ok(ProviderReply::success(request_id))
    }

    async fn check(&self, request_id: &str, pin: &str) -> Result<ProviderReply, String> {
        let now = Instant::now();
        let mut pending = self.lock_pending()?;
        pending.retain(|_, verification| verification.expires_at > now);

        if !pending.contains_key(request_id) {
            return Ok(ProviderReply::failure(
                status::REQUEST_NOT_FOUND,
                "The Verify request could not be found",
                "",
            ));
        }

        if pin != self.pin {
            return Ok(ProviderReply::failure(
                status::WRONG_CODE,
                "The code provided does not match the expected value",
                request_id,
            ));
        }

        pending.remove(request_id);
        info!(provider = "mock", "Verification completed (mock)");
        Ok(ProviderReply::success(request_id))
    }
}
