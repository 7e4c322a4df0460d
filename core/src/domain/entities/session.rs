//! Session entity holding the verification state of one browser session.
//!
//! Values are a string-keyed map of JSON values so that a stored value of the
//! wrong type is representable and can be rejected when read.

use std::collections::HashMap;

use pv_shared::config::SessionConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::SessionError;

/// Session key holding the provider request id
pub const REQUEST_ID_KEY: &str = "requestID";

/// Session key holding the verified flag
pub const VERIFIED_KEY: &str = "verified";

pub type SessionValues = HashMap<String, Value>;

/// Cookie attributes applied whenever the session is saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub path: String,
    /// Lifetime in seconds
    pub max_age: u64,
    pub http_only: bool,
    pub secure: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age: 120,
            http_only: true,
            secure: true,
        }
    }
}

impl SessionOptions {
    /// Cookie attributes from the session configuration
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            path: config.path.clone(),
            max_age: config.max_age,
            http_only: config.http_only,
            secure: config.secure,
        }
    }
}

/// A session as handed out by a session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier
    pub id: String,
    /// Stored values
    #[serde(default)]
    pub values: SessionValues,
    /// Attributes used for the next save
    #[serde(default)]
    pub options: SessionOptions,
}

impl Session {
    /// Create an empty session with a fresh random identifier
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string())
    }

    /// Create an empty session with the given identifier
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: SessionValues::new(),
            options: SessionOptions::default(),
        }
    }

    /// The pending request id
    ///
    /// Fails when the value is absent, not a string, or empty.
    pub fn request_id(&self) -> Result<&str, SessionError> {
        match self.values.get(REQUEST_ID_KEY) {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.as_str()),
            _ => Err(SessionError::InvalidRequestId),
        }
    }

    pub fn set_request_id(&mut self, request_id: impl Into<String>) {
        self.values
            .insert(REQUEST_ID_KEY.to_string(), Value::String(request_id.into()));
    }

    pub fn clear_request_id(&mut self) {
        self.values.remove(REQUEST_ID_KEY);
    }

    /// Whether the session is verified; any non-boolean value counts as unverified
    pub fn is_verified(&self) -> bool {
        matches!(self.values.get(VERIFIED_KEY), Some(Value::Bool(true)))
    }

    pub fn mark_verified(&mut self) {
        self.values.insert(VERIFIED_KEY.to_string(), Value::Bool(true));
    }

    /// Typed view of the verification values
    pub fn verification(&self) -> VerificationSession {
        VerificationSession {
            request_id: self.request_id().ok().map(str::to_string),
            verified: self.is_verified(),
        }
    }

    /// Current position in the verification state machine
    pub fn state(&self) -> FlowState {
        if self.is_verified() {
            return FlowState::Verified;
        }
        match self.request_id() {
            Ok(id) => FlowState::PendingPin(id.to_string()),
            Err(_) => FlowState::NoRequest,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Verification values of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSession {
    pub request_id: Option<String>,
    pub verified: bool,
}

/// States of the per-session verification flow
///
/// ```text
/// NoRequest  --start-->            PendingPin
/// PendingPin --check(verified)-->  Verified
/// PendingPin --check(rejected)-->  PendingPin
/// any        --expiry-->           NoRequest
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    NoRequest,
    PendingPin(String),
    Verified,
}
