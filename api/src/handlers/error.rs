//! Mapping of domain errors onto HTTP responses
//!
//! User-visible outcomes are rendered with the `failure` view; server faults
//! answer with the error text as `text/plain`.

use actix_web::{http::StatusCode, HttpResponse};
use pv_core::errors::{DomainError, ValidationError};
use pv_core::services::verification::status;
use serde_json::json;

use crate::render::{Renderer, FAILURE_VIEW};

/// Which phase of the flow produced the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Check,
}

/// Status code for a domain error in the given phase
pub fn status_for(error: &DomainError, phase: Phase) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::ProviderRejection { .. } => match phase {
            Phase::Start => StatusCode::BAD_REQUEST,
            Phase::Check => StatusCode::FORBIDDEN,
        },
        DomainError::ProviderConflict { .. } => StatusCode::CONFLICT,
        DomainError::Session(_)
        | DomainError::ProviderTransport { .. }
        | DomainError::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message shown on the failure page
fn user_message(error: &DomainError, phase: Phase) -> String {
    match (error, phase) {
        (DomainError::Validation(ValidationError::InvalidPhone), _) => {
            "invalid telephone number".to_string()
        }
        (DomainError::Validation(ValidationError::InvalidPin), _) => "invalid pin code".to_string(),
        (DomainError::ProviderRejection { detail, .. }, Phase::Start) => {
            format!("this telephone number cannot be verified: {}", detail)
        }
        (DomainError::ProviderRejection { status: code, .. }, Phase::Check)
            if status::ends_request(code) =>
        {
            "too many wrong codes, please start a new verification".to_string()
        }
        (DomainError::ProviderRejection { .. }, Phase::Check) => "verification failed".to_string(),
        (DomainError::ProviderConflict { .. }, _) => {
            "there is a concurrent verification request in-progress, please retry".to_string()
        }
        (other, _) => other.to_string(),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(
    error: &DomainError,
    phase: Phase,
    renderer: &dyn Renderer,
) -> HttpResponse {
    let status = status_for(error, phase);

    if error.is_fatal() {
        log::error!("Domain Error ({:?}): {}", phase, error);
        return plain_text(status, &error.to_string());
    }

    log::warn!("Request declined ({:?}): {}", phase, error);
    let message = user_message(error, phase);
    match renderer.render(FAILURE_VIEW, &json!({ "message": message })) {
        Ok(body) => html(status, body),
        Err(e) => render_failure(&e),
    }
}

/// Response for a view that could not be rendered
pub fn render_failure(error: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("Render Error: {}", error);
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string())
}

pub fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub fn plain_text(status: StatusCode, body: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(body.to_string())
}
