use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use pv_core::domain::entities::FlowState;
use pv_core::services::{SessionStore, VerificationProvider};
use serde_json::json;

use super::AppState;
use crate::handlers::{html, plain_text, render_failure};
use crate::render::HOME_VIEW;

/// Handler for GET /
///
/// Renders the home page with the session's verified flag.
pub async fn home<P, S>(req: HttpRequest, state: web::Data<AppState<P, S>>) -> HttpResponse
where
    P: VerificationProvider + 'static,
    S: SessionStore + 'static,
{
    let session_id = state.cookie.session_id(&req);

    let verified = match state.flow.status(session_id.as_deref()).await {
        Ok(flow_state) => flow_state == FlowState::Verified,
        Err(e) => {
            log::error!("Failed to read session for home page: {}", e);
            return plain_text(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    match state
        .renderer
        .render(HOME_VIEW, &json!({ "verified": verified }))
    {
        Ok(body) => html(StatusCode::OK, body),
        Err(e) => render_failure(&e),
    }
}
