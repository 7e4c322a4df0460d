use actix_web::{http::header, web, HttpRequest, HttpResponse};
use pv_core::services::{SessionStore, VerificationProvider};
use serde::Deserialize;

use super::AppState;
use crate::handlers::{handle_domain_error, Phase};

/// Form body of POST /check
#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    pub pin: String,
}

/// Handler for POST /check
///
/// Checks `pin` against the request id stored in the session.
///
/// - 303: verified, redirect to `/` with the updated session cookie
/// - 400: malformed PIN
/// - 403: PIN declined by the provider
/// - 409: another request is in flight; retry without side effects
/// - 500: missing request id, session or provider failure
pub async fn check<P, S>(
    req: HttpRequest,
    state: web::Data<AppState<P, S>>,
    form: web::Form<CheckForm>,
) -> HttpResponse
where
    P: VerificationProvider + 'static,
    S: SessionStore + 'static,
{
    let session_id = state.cookie.session_id(&req);

    match state.flow.check(session_id.as_deref(), &form.pin).await {
        Ok(result) => {
            log::info!("Session verified");
            HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .cookie(state.cookie.cookie(&result.session))
                .finish()
        }
        Err(e) => handle_domain_error(&e, Phase::Check, state.renderer.as_ref()),
    }
}
