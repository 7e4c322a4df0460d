//! Verification flow implementation

use std::sync::Arc;

use pv_shared::utils::Validator;

use crate::domain::entities::{FlowState, Session, SessionOptions};
use crate::domain::value_objects::{PhoneNumber, Pin};
use crate::errors::{DomainError, DomainResult, SessionError};
use crate::services::verification::{
    status, CheckOutcome, SessionStore, VerificationOrchestrator, VerificationProvider,
    VerifyOutcome,
};

/// Result of a successful start: the saved session and how it was started
#[derive(Debug, Clone)]
pub struct StartVerificationResult {
    pub session: Session,
    /// `Started` or `AlreadyInProgress`
    pub outcome: VerifyOutcome,
}

/// Result of a successful check
#[derive(Debug, Clone)]
pub struct CheckVerificationResult {
    pub session: Session,
}

/// Verification flow over a session store
pub struct VerificationFlow<P: VerificationProvider, S: SessionStore> {
    orchestrator: Arc<VerificationOrchestrator<P>>,
    sessions: Arc<S>,
    validator: Arc<Validator>,
    /// Cookie attributes applied on every save
    options: SessionOptions,
}

impl<P: VerificationProvider, S: SessionStore> VerificationFlow<P, S> {
    pub fn new(
        orchestrator: Arc<VerificationOrchestrator<P>>,
        sessions: Arc<S>,
        validator: Arc<Validator>,
        options: SessionOptions,
    ) -> Self {
        Self {
            orchestrator,
            sessions,
            validator,
            options,
        }
    }

    /// Current verification state of a session
    pub async fn status(&self, session_id: Option<&str>) -> DomainResult<FlowState> {
        Ok(self.load(session_id).await?.state())
    }

    /// Start (or reattach to) a verification for the submitted number
    ///
    /// The session gains a `requestID` only when the provider started or
    /// already has a verification in flight; every other outcome leaves it
    /// untouched.
    pub async fn start(
        &self,
        session_id: Option<&str>,
        tel: &str,
    ) -> DomainResult<StartVerificationResult> {
        let phone = PhoneNumber::parse(tel, &self.validator)?;
        let mut session = self.load(session_id).await?;

        let outcome = self.orchestrator.start_verification(&phone).await;
        match &outcome {
            VerifyOutcome::Started { request_id }
            | VerifyOutcome::AlreadyInProgress { request_id } => {
                session.set_request_id(request_id.clone());
            }
            VerifyOutcome::Rejected { status, detail } => {
                return Err(DomainError::ProviderRejection {
                    status: status.clone(),
                    detail: detail.clone(),
                });
            }
            VerifyOutcome::ProviderError { status, detail } => {
                return Err(provider_failure(status.clone(), detail.clone()));
            }
        }

        self.persist(&mut session).await?;
        tracing::info!(
            phone = %phone.masked(),
            session_id = %session.id,
            reattached = matches!(outcome, VerifyOutcome::AlreadyInProgress { .. }),
            event = "verification_pending",
            "Stored request id in session"
        );

        Ok(StartVerificationResult { session, outcome })
    }

    /// Check the submitted PIN against the session's pending request
    ///
    /// On success the session is marked verified and its request id removed,
    /// so the same request id cannot be checked again. The request id is also
    /// removed when the provider closes the request after too many wrong PINs.
    pub async fn check(
        &self,
        session_id: Option<&str>,
        pin: &str,
    ) -> DomainResult<CheckVerificationResult> {
        let pin = Pin::parse(pin, &self.validator)?;
        let mut session = self.load(session_id).await?;
        let request_id = session.request_id()?.to_string();

        match self.orchestrator.check_verification(&request_id, &pin).await? {
            CheckOutcome::Verified => {
                session.mark_verified();
                session.clear_request_id();
                self.persist(&mut session).await?;
                tracing::info!(
                    session_id = %session.id,
                    event = "session_verified",
                    "Session marked as verified"
                );
                Ok(CheckVerificationResult { session })
            }
            CheckOutcome::Rejected {
                status: code,
                detail,
            } => {
                // The provider has closed the request; only a new start can continue
                if status::ends_request(&code) {
                    session.clear_request_id();
                    self.persist(&mut session).await?;
                    tracing::warn!(
                        session_id = %session.id,
                        status = %code,
                        event = "verification_closed",
                        "Request closed by the provider, cleared request id"
                    );
                }
                Err(DomainError::ProviderRejection {
                    status: code,
                    detail,
                })
            }
            CheckOutcome::ProviderError { status, detail } => {
                Err(provider_failure(status, detail))
            }
        }
    }

    async fn load(&self, session_id: Option<&str>) -> DomainResult<Session> {
        self.sessions
            .load(session_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event = "session_load_failed", "Failed to load session");
                SessionError::Store { message: e }.into()
            })
    }

    async fn persist(&self, session: &mut Session) -> DomainResult<()> {
        session.options = self.options.clone();
        self.sessions.save(session).await.map_err(|e| {
            tracing::error!(
                session_id = %session.id,
                error = %e,
                event = "session_save_failed",
                "Failed to save session"
            );
            SessionError::Store { message: e }.into()
        })
    }
}

/// Map a fatal provider outcome onto the error taxonomy
fn provider_failure(status: Option<String>, detail: String) -> DomainError {
    match status {
        Some(status) => DomainError::Provider { status, detail },
        None => DomainError::ProviderTransport { message: detail },
    }
}
