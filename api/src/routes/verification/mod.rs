//! Verification route handlers
//!
//! - `GET /` shows whether the session is verified
//! - `POST /verify` starts a verification for the submitted number
//! - `POST /check` checks the submitted PIN

pub mod check;
pub mod home;
pub mod verify;

use std::sync::Arc;

use pv_core::services::{SessionStore, VerificationFlow, VerificationProvider};

use crate::render::Renderer;
use crate::session::SessionCookie;

pub use check::check;
pub use home::home;
pub use verify::verify;

/// Application state that holds shared services
pub struct AppState<P, S>
where
    P: VerificationProvider,
    S: SessionStore,
{
    pub flow: Arc<VerificationFlow<P, S>>,
    pub cookie: SessionCookie,
    pub renderer: Arc<dyn Renderer>,
}

impl<P, S> AppState<P, S>
where
    P: VerificationProvider,
    S: SessionStore,
{
    pub fn new(
        flow: Arc<VerificationFlow<P, S>>,
        cookie: SessionCookie,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            flow,
            cookie,
            renderer,
        }
    }
}
