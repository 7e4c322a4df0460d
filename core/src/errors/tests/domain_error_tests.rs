//! Tests for the domain error taxonomy

use crate::errors::{DomainError, SessionError, ValidationError};

#[test]
fn test_validation_errors_convert_and_are_not_fatal() {
    let error: DomainError = ValidationError::InvalidPhone.into();
    assert_eq!(error, DomainError::Validation(ValidationError::InvalidPhone));
    assert!(!error.is_fatal());
    assert_eq!(error.to_string(), "invalid telephone number");
}

#[test]
fn test_session_errors_are_fatal() {
    let error: DomainError = SessionError::InvalidRequestId.into();
    assert!(error.is_fatal());
    assert_eq!(error.to_string(), "invalid requestID in this session");

    let error: DomainError = SessionError::Store {
        message: "connection refused".to_string(),
    }
    .into();
    assert!(error.is_fatal());
    assert!(error.to_string().contains("connection refused"));
}

#[test]
fn test_provider_error_classification() {
    assert!(DomainError::ProviderTransport { message: "timeout".to_string() }.is_fatal());
    assert!(DomainError::Provider {
        status: "5".to_string(),
        detail: "Internal Error".to_string(),
    }
    .is_fatal());
    assert!(!DomainError::ProviderRejection {
        status: "16".to_string(),
        detail: "The code provided does not match the expected value".to_string(),
    }
    .is_fatal());
    assert!(!DomainError::ProviderConflict { request_id: "abc".to_string() }.is_fatal());
}

#[test]
fn test_provider_error_message_carries_status_and_detail() {
    let error = DomainError::Provider {
        status: "4".to_string(),
        detail: "Bad Credentials".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "fail to start verification, status=4, detail=Bad Credentials"
    );
}
