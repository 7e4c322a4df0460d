//! Signed session cookie
//!
//! The cookie only carries the session id; values live in the session
//! store. The id is signed with a key derived from `SESSION_AUTH_KEY`, and a
//! cookie whose signature does not verify is treated as absent.

use actix_web::cookie::{time::Duration, Cookie, CookieJar, Key, SameSite};
use actix_web::HttpRequest;
use pv_core::domain::entities::Session;
use pv_shared::config::{Environment, SessionConfig};
use thiserror::Error;

/// Minimum length of the signing key material
pub const MIN_KEY_LENGTH: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionKeyError {
    #[error("not found SESSION_AUTH_KEY in env")]
    Missing,

    #[error("SESSION_AUTH_KEY must be at least 32 bytes, got {0}")]
    TooShort(usize),
}

/// Build the cookie signing key
///
/// Without `SESSION_AUTH_KEY` a random key is generated outside production,
/// which invalidates every session on restart.
pub fn signing_key(
    config: &SessionConfig,
    environment: Environment,
) -> Result<Key, SessionKeyError> {
    match config.auth_key.as_deref() {
        Some(secret) if secret.len() >= MIN_KEY_LENGTH => Ok(Key::derive_from(secret.as_bytes())),
        Some(secret) => Err(SessionKeyError::TooShort(secret.len())),
        None if environment.is_production() => Err(SessionKeyError::Missing),
        None => {
            log::warn!("SESSION_AUTH_KEY not set, using a random session signing key");
            Ok(Key::generate())
        }
    }
}

/// Reads and writes the session cookie
#[derive(Clone)]
pub struct SessionCookie {
    name: String,
    key: Key,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, key: Key) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    pub fn from_config(config: &SessionConfig, key: Key) -> Self {
        Self::new(config.cookie_name.clone(), key)
    }

    /// Session id carried by the request, if its signature verifies
    pub fn session_id(&self, req: &HttpRequest) -> Option<String> {
        let cookie = req.cookie(&self.name)?;
        let mut jar = CookieJar::new();
        jar.add_original(cookie);

        let verified = jar.signed(&self.key).get(&self.name);
        if verified.is_none() {
            log::warn!("Ignoring session cookie with an invalid signature");
        }
        verified
            .map(|cookie| cookie.value().to_string())
            .filter(|id| !id.is_empty())
    }

    /// Signed cookie for a saved session, using the session's options
    pub fn cookie(&self, session: &Session) -> Cookie<'static> {
        let max_age = i64::try_from(session.options.max_age).unwrap_or(i64::MAX);
        let cookie = Cookie::build(self.name.clone(), session.id.clone())
            .path(session.options.path.clone())
            .max_age(Duration::seconds(max_age))
            .http_only(session.options.http_only)
            .secure(session.options.secure)
            .same_site(SameSite::Lax)
            .finish();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(&self.name)
            .cloned()
            .unwrap_or_else(|| Cookie::new(self.name.clone(), String::new()))
    }
}
