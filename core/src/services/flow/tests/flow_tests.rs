//! Tests for the session-aware verification flow

use std::sync::Arc;

use pv_shared::utils::Validator;
use serde_json::json;

use crate::domain::entities::{FlowState, Session, SessionOptions, REQUEST_ID_KEY, VERIFIED_KEY};
use crate::errors::{DomainError, SessionError, ValidationError};
use crate::services::flow::VerificationFlow;
use crate::services::verification::tests::mocks::{
    MockSessionStore, MockVerificationProvider, MOCK_PIN,
};
use crate::services::verification::{
    ProviderReply, VerificationOrchestrator, VerificationServiceConfig, VerifyOutcome,
};

const PHONE: &str = "+14155552671";

struct Harness {
    provider: Arc<MockVerificationProvider>,
    store: Arc<MockSessionStore>,
    flow: VerificationFlow<MockVerificationProvider, MockSessionStore>,
}

fn harness_with(provider: MockVerificationProvider, store: MockSessionStore) -> Harness {
    let provider = Arc::new(provider);
    let store = Arc::new(store);
    let orchestrator = Arc::new(VerificationOrchestrator::new(
        provider.clone(),
        VerificationServiceConfig::default(),
    ));
    let flow = VerificationFlow::new(
        orchestrator,
        store.clone(),
        Arc::new(Validator::new()),
        SessionOptions::default(),
    );
    Harness {
        provider,
        store,
        flow,
    }
}

fn harness() -> Harness {
    harness_with(MockVerificationProvider::new(), MockSessionStore::new(false))
}

#[tokio::test]
async fn test_start_stores_request_id() {
    let h = harness();

    let result = h.flow.start(None, PHONE).await.unwrap();
    assert_eq!(
        result.outcome,
        VerifyOutcome::Started {
            request_id: "req-1".to_string()
        }
    );

    let stored = h.store.get(&result.session.id).unwrap();
    assert_eq!(stored.request_id(), Ok("req-1"));
    assert!(!stored.values.contains_key(VERIFIED_KEY));
    assert_eq!(stored.options, SessionOptions::default());
    assert_eq!(stored.state(), FlowState::PendingPin("req-1".to_string()));
}

#[tokio::test]
async fn test_start_reattaches_and_populates_session() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Ok(ProviderReply::failure(
            "10",
            "Concurrent verifications to the same number are not allowed",
            "in-flight",
        ))]),
        MockSessionStore::new(false),
    );

    let result = h.flow.start(None, PHONE).await.unwrap();
    assert_eq!(
        result.outcome,
        VerifyOutcome::AlreadyInProgress {
            request_id: "in-flight".to_string()
        }
    );
    let stored = h.store.get(&result.session.id).unwrap();
    assert_eq!(stored.request_id(), Ok("in-flight"));
}

#[tokio::test]
async fn test_duplicate_start_keeps_request_id_stable() {
    let h = harness();

    let first = h.flow.start(None, PHONE).await.unwrap();
    let second = h
        .flow
        .start(Some(&first.session.id), PHONE)
        .await
        .unwrap();

    assert_eq!(first.session.id, second.session.id);
    assert!(matches!(
        second.outcome,
        VerifyOutcome::AlreadyInProgress { ref request_id } if request_id == "req-1"
    ));
    assert_eq!(
        h.store.get(&first.session.id).unwrap().request_id(),
        Ok("req-1")
    );
}

#[tokio::test]
async fn test_start_fatal_provider_error_leaves_session_untouched() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Ok(ProviderReply::failure(
            "5",
            "Internal Error",
            "",
        ))]),
        MockSessionStore::new(false),
    );
    let mut existing = Session::with_id("sid");
    existing.values.insert("other".to_string(), json!(1));
    h.store.insert(existing.clone());

    let err = h.flow.start(Some("sid"), PHONE).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Provider {
            status: "5".to_string(),
            detail: "Internal Error".to_string(),
        }
    );
    assert!(err.is_fatal());
    assert_eq!(h.store.get("sid").unwrap(), existing);
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_start_transport_failure() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Err("dns error".to_string())]),
        MockSessionStore::new(false),
    );

    let err = h.flow.start(None, PHONE).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::ProviderTransport {
            message: "dns error".to_string()
        }
    );
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_start_number_declined() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Ok(ProviderReply::failure(
            "15",
            "The destination number is not in a supported network",
            "",
        ))]),
        MockSessionStore::new(false),
    );

    let err = h.flow.start(None, PHONE).await.unwrap_err();
    assert!(matches!(err, DomainError::ProviderRejection { ref status, .. } if status == "15"));
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_start_invalid_phone_skips_provider() {
    let h = harness();

    for tel in ["", "4155552671", "+0123", "+1415555267x"] {
        let err = h.flow.start(None, tel).await.unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::InvalidPhone));
    }
    assert_eq!(h.provider.request_count(), 0);
}

#[tokio::test]
async fn test_start_session_store_failure() {
    let h = harness_with(MockVerificationProvider::new(), MockSessionStore::new(true));

    let err = h.flow.start(None, PHONE).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::Store { .. })));
    assert_eq!(h.provider.request_count(), 0);
}

#[tokio::test]
async fn test_start_then_check_marks_session_verified() {
    let h = harness();

    let started = h.flow.start(None, PHONE).await.unwrap();
    let sid = started.session.id.clone();
    assert_eq!(
        h.flow.status(Some(&sid)).await.unwrap(),
        FlowState::PendingPin("req-1".to_string())
    );

    let checked = h.flow.check(Some(&sid), MOCK_PIN).await.unwrap();
    assert!(checked.session.is_verified());

    let stored = h.store.get(&sid).unwrap();
    assert!(stored.is_verified());
    assert!(!stored.values.contains_key(REQUEST_ID_KEY));
    assert_eq!(h.flow.status(Some(&sid)).await.unwrap(), FlowState::Verified);
}

#[tokio::test]
async fn test_request_id_cannot_be_replayed_after_success() {
    let h = harness();

    let started = h.flow.start(None, PHONE).await.unwrap();
    let sid = started.session.id.clone();
    h.flow.check(Some(&sid), MOCK_PIN).await.unwrap();

    let err = h.flow.check(Some(&sid), MOCK_PIN).await.unwrap_err();
    assert_eq!(err, DomainError::Session(SessionError::InvalidRequestId));
    assert_eq!(h.provider.check_count(), 1);
}

#[tokio::test]
async fn test_check_rejected_leaves_session_unchanged() {
    let h = harness();

    let started = h.flow.start(None, PHONE).await.unwrap();
    let sid = started.session.id.clone();
    let before = h.store.get(&sid).unwrap();

    let err = h.flow.check(Some(&sid), "0000").await.unwrap_err();
    assert!(matches!(err, DomainError::ProviderRejection { ref status, .. } if status == "16"));
    assert!(!err.is_fatal());
    assert_eq!(h.store.get(&sid).unwrap(), before);

    // The user may retry with the right PIN
    h.flow.check(Some(&sid), MOCK_PIN).await.unwrap();
    assert!(h.store.get(&sid).unwrap().is_verified());
}

#[tokio::test]
async fn test_check_too_many_wrong_codes_clears_request_id() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Ok(ProviderReply::failure(
            "17",
            "The wrong code was provided too many times",
            "req-7",
        ))]),
        MockSessionStore::new(false),
    );
    let mut session = Session::with_id("sid");
    session.set_request_id("req-7");
    h.store.insert(session);

    let err = h.flow.check(Some("sid"), "0000").await.unwrap_err();
    assert!(matches!(err, DomainError::ProviderRejection { ref status, .. } if status == "17"));
    assert!(!err.is_fatal());

    let stored = h.store.get("sid").unwrap();
    assert_eq!(stored.state(), FlowState::NoRequest);
    assert!(!stored.is_verified());

    // The next start creates a fresh request for the same session
    let restarted = h.flow.start(Some("sid"), PHONE).await.unwrap();
    assert_eq!(restarted.session.id, "sid");
    assert!(matches!(restarted.outcome, VerifyOutcome::Started { .. }));
    assert_eq!(h.provider.check_count(), 1);
}

#[tokio::test]
async fn test_check_conflict_leaves_session_unchanged() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Ok(ProviderReply::failure(
            "10",
            "Concurrent verifications to the same number are not allowed",
            "req-9",
        ))]),
        MockSessionStore::new(false),
    );
    let mut session = Session::with_id("sid");
    session.set_request_id("req-9");
    h.store.insert(session.clone());

    let err = h.flow.check(Some("sid"), "1234").await.unwrap_err();
    assert_eq!(
        err,
        DomainError::ProviderConflict {
            request_id: "req-9".to_string()
        }
    );
    assert_eq!(h.store.get("sid").unwrap(), session);
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_check_without_request_id_skips_provider() {
    let h = harness();

    let err = h.flow.check(None, "1234").await.unwrap_err();
    assert_eq!(err, DomainError::Session(SessionError::InvalidRequestId));
    assert_eq!(h.provider.check_count(), 0);
}

#[tokio::test]
async fn test_check_with_non_string_request_id_skips_provider() {
    let h = harness();
    let mut session = Session::with_id("sid");
    session.values.insert(REQUEST_ID_KEY.to_string(), json!(12345));
    h.store.insert(session);

    let err = h.flow.check(Some("sid"), "1234").await.unwrap_err();
    assert_eq!(err, DomainError::Session(SessionError::InvalidRequestId));
    assert_eq!(h.provider.check_count(), 0);
}

#[tokio::test]
async fn test_check_invalid_pin_is_validation_error() {
    let h = harness();
    let started = h.flow.start(None, PHONE).await.unwrap();

    for pin in ["", "123", "12345", "12a4"] {
        let err = h
            .flow
            .check(Some(&started.session.id), pin)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::InvalidPin));
    }
    assert_eq!(h.provider.check_count(), 0);
}

#[tokio::test]
async fn test_check_transport_failure_is_fatal() {
    let h = harness_with(
        MockVerificationProvider::with_replies(vec![Err("connection refused".to_string())]),
        MockSessionStore::new(false),
    );
    let mut session = Session::with_id("sid");
    session.set_request_id("req-1");
    h.store.insert(session.clone());

    let err = h.flow.check(Some("sid"), "1234").await.unwrap_err();
    assert_eq!(
        err,
        DomainError::ProviderTransport {
            message: "connection refused".to_string()
        }
    );
    assert_eq!(h.store.get("sid").unwrap(), session);
}

#[tokio::test]
async fn test_status_of_unknown_session() {
    let h = harness();
    assert_eq!(
        h.flow.status(Some("missing")).await.unwrap(),
        FlowState::NoRequest
    );
    assert_eq!(h.flow.status(None).await.unwrap(), FlowState::NoRequest);
}
