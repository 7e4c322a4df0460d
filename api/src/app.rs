//! Application state and factory
//!
//! This module wires the verification flow, the session cookie and the
//! renderer into application state and provides the factory for creating
//! the Actix-web application.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App};
use pv_core::domain::entities::SessionOptions;
use pv_core::services::{
    SessionStore, VerificationFlow, VerificationOrchestrator, VerificationProvider,
    VerificationServiceConfig,
};
use pv_shared::config::AppConfig;
use pv_shared::utils::Validator;

use crate::middleware::SecurityMiddleware;
use crate::render::{HtmlRenderer, Renderer};
use crate::routes::health::{health_check, not_found};
use crate::routes::verification::{check, home, verify, AppState};
use crate::session::SessionCookie;

/// Build the application state from configuration and the chosen backends
pub fn build_state<P, S>(
    config: &AppConfig,
    provider: Arc<P>,
    store: Arc<S>,
    cookie: SessionCookie,
) -> web::Data<AppState<P, S>>
where
    P: VerificationProvider + 'static,
    S: SessionStore + 'static,
{
    let orchestrator = Arc::new(VerificationOrchestrator::new(
        provider,
        VerificationServiceConfig::from_app_config(&config.provider, &config.session),
    ));
    let flow = Arc::new(VerificationFlow::new(
        orchestrator,
        store,
        Arc::new(Validator::new()),
        SessionOptions::from_config(&config.session),
    ));
    let renderer: Arc<dyn Renderer> = Arc::new(HtmlRenderer::new());

    web::Data::new(AppState::new(flow, cookie, renderer))
}

/// Create and configure the application with all dependencies
pub fn create_app<P, S>(
    app_state: web::Data<AppState<P, S>>,
    security: SecurityMiddleware,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    P: VerificationProvider + 'static,
    S: SessionStore + 'static,
{
    App::new()
        .app_data(app_state)
        // Security headers outermost, then logging
        .wrap(Logger::default())
        .wrap(security)
        .route("/", web::get().to(home::<P, S>))
        .route("/verify", web::post().to(verify::<P, S>))
        .route("/check", web::post().to(check::<P, S>))
        .route("/health", web::get().to(health_check))
        .default_service(web::route().to(not_found))
}
