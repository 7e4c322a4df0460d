use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use pv_core::services::{SessionStore, VerificationProvider, VerifyOutcome};
use pv_shared::utils::phone::mask_phone_number;
use serde::Deserialize;
use serde_json::Value;

use super::AppState;
use crate::handlers::{handle_domain_error, render_failure, Phase};
use crate::render::PIN_FORM_VIEW;

/// Form body of POST /verify
#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub tel: String,
}

/// Handler for POST /verify
///
/// Starts a verification for `tel` (or reattaches to the one already in
/// flight), stores the request id in the session and shows the PIN form.
///
/// - 200: PIN form, session cookie set
/// - 400: invalid number, or number declined by the provider
/// - 500: session or provider failure
pub async fn verify<P, S>(
    req: HttpRequest,
    state: web::Data<AppState<P, S>>,
    form: web::Form<VerifyForm>,
) -> HttpResponse
where
    P: VerificationProvider + 'static,
    S: SessionStore + 'static,
{
    let session_id = state.cookie.session_id(&req);
    log::info!(
        "Processing verify request for phone: {}",
        mask_phone_number(&form.tel)
    );

    let result = match state.flow.start(session_id.as_deref(), &form.tel).await {
        Ok(result) => result,
        Err(e) => return handle_domain_error(&e, Phase::Start, state.renderer.as_ref()),
    };

    if let VerifyOutcome::AlreadyInProgress { .. } = result.outcome {
        log::info!("Reattached to an in-flight verification");
    }

    match state.renderer.render(PIN_FORM_VIEW, &Value::Null) {
        Ok(body) => HttpResponse::build(StatusCode::OK)
            .cookie(state.cookie.cookie(&result.session))
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => render_failure(&e),
    }
}
