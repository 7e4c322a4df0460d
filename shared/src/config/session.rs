//! Session cookie and session store configuration

use serde::{Deserialize, Serialize};

use super::{parse_bool_or, parse_or, ConfigError};

/// Lifetime of a verification session in seconds
pub const DEFAULT_SESSION_MAX_AGE: u64 = 120;

/// Accepted `SESSION_MAX_AGE` range; it doubles as the Vonage `pin_expiry`,
/// which must lie between 60 and 3600 seconds
pub const SESSION_MAX_AGE_RANGE: std::ops::RangeInclusive<u64> = 60..=3600;

/// Where session values are kept between requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// Redis, one key per session with a TTL
    Redis,
}

impl std::str::FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(SessionBackend::Memory),
            "redis" => Ok(SessionBackend::Redis),
            _ => Err(format!("Invalid session store: {}", s)),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Session cookie name
    pub cookie_name: String,

    /// Session lifetime in seconds (cookie Max-Age and store TTL)
    pub max_age: u64,

    /// Session cookie path
    pub path: String,

    /// Session cookie HttpOnly flag
    pub http_only: bool,

    /// Session cookie secure flag (HTTPS only)
    pub secure: bool,

    /// Key used to sign the session cookie
    #[serde(skip_serializing)]
    pub auth_key: Option<String>,

    /// Session store backend
    #[serde(default)]
    pub backend: SessionBackend,

    /// Redis connection URL (redis backend only)
    pub redis_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: String::from("phoneverify"),
            max_age: DEFAULT_SESSION_MAX_AGE,
            path: String::from("/"),
            http_only: true,
            secure: true,
            auth_key: None,
            backend: SessionBackend::Memory,
            redis_url: String::from("redis://localhost:6379"),
        }
    }
}

impl SessionConfig {
    /// Load the `SESSION_*` and `REDIS_URL` variables
    pub fn from_source<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let backend = match lookup("SESSION_STORE") {
            Some(value) => value.parse().map_err(|message| ConfigError::Invalid {
                key: "SESSION_STORE".to_string(),
                message,
            })?,
            None => defaults.backend,
        };

        let max_age = parse_or(lookup, "SESSION_MAX_AGE", defaults.max_age)?;
        if !SESSION_MAX_AGE_RANGE.contains(&max_age) {
            return Err(ConfigError::Invalid {
                key: "SESSION_MAX_AGE".to_string(),
                message: format!(
                    "{} is outside {}..={} seconds",
                    max_age,
                    SESSION_MAX_AGE_RANGE.start(),
                    SESSION_MAX_AGE_RANGE.end()
                ),
            });
        }

        Ok(Self {
            cookie_name: lookup("SESSION_NAME").unwrap_or(defaults.cookie_name),
            max_age,
            path: defaults.path,
            http_only: defaults.http_only,
            secure: parse_bool_or(lookup, "SESSION_SECURE", defaults.secure)?,
            auth_key: lookup("SESSION_AUTH_KEY").filter(|key| !key.is_empty()),
            backend,
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
        })
    }
}
