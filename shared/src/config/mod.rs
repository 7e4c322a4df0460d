//! Configuration module
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection
//! - `provider` - Verification provider credentials and request parameters
//! - `server` - HTTP server binding
//! - `session` - Session cookie attributes and session store
//!
//! Everything is read from the process environment once at start-up and then
//! shared immutably.

pub mod environment;
pub mod provider;
pub mod server;
pub mod session;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Re-export commonly used types
pub use environment::Environment;
pub use provider::{ProviderConfig, ProviderKind};
pub use server::ServerConfig;
pub use session::{SessionBackend, SessionConfig};

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("not found {0} in env")]
    Missing(String),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Verification provider configuration
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_source<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            environment: Environment::from_source(lookup),
            server: ServerConfig::from_source(lookup)?,
            session: SessionConfig::from_source(lookup)?,
            provider: ProviderConfig::from_source(lookup)?,
        })
    }
}

/// Read a required, non-empty variable
pub(crate) fn require<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

/// Parse an optional variable, falling back to `default` when unset
pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Parse an optional boolean flag (`true/false`, `1/0`, `yes/no`)
pub(crate) fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|value| value.trim().to_lowercase()) {
        Some(value) => match value.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key: key.to_string(),
                message: format!("expected a boolean, got {}", value),
            }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_credentials() {
        let lookup = source(&[("VONAGE_API_KEY", "key"), ("VONAGE_API_SECRET", "secret")]);
        let config = AppConfig::from_source(&lookup).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.bind_address(), "127.0.0.1:1323");
        assert_eq!(config.session.max_age, 120);
        assert_eq!(config.session.path, "/");
        assert!(config.session.http_only);
        assert!(config.session.secure);
        assert_eq!(config.session.backend, SessionBackend::Memory);
        assert_eq!(config.provider.kind, ProviderKind::Vonage);
        assert_eq!(config.provider.brand, "vonage-go-sample");
        assert_eq!(config.provider.language, "ja-jp");
        assert_eq!(config.provider.workflow_id, 6);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let lookup = source(&[("VONAGE_API_SECRET", "secret")]);
        let err = AppConfig::from_source(&lookup).unwrap_err();
        assert_eq!(err, ConfigError::Missing("VONAGE_API_KEY".to_string()));
    }

    #[test]
    fn test_missing_api_secret_is_fatal() {
        let lookup = source(&[("VONAGE_API_KEY", "key"), ("VONAGE_API_SECRET", "")]);
        let err = AppConfig::from_source(&lookup).unwrap_err();
        assert_eq!(err, ConfigError::Missing("VONAGE_API_SECRET".to_string()));
    }

    #[test]
    fn test_mock_provider_needs_no_credentials() {
        let lookup = source(&[("VERIFY_PROVIDER", "mock")]);
        let config = AppConfig::from_source(&lookup).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Mock);
        assert!(config.provider.api_key.is_empty());
    }

    #[test]
    fn test_overrides() {
        let lookup = source(&[
            ("VONAGE_API_KEY", "key"),
            ("VONAGE_API_SECRET", "secret"),
            ("ENVIRONMENT", "production"),
            ("SERVER_PORT", "8080"),
            ("SESSION_MAX_AGE", "300"),
            ("SESSION_SECURE", "false"),
            ("SESSION_STORE", "redis"),
            ("SESSION_AUTH_KEY", "k"),
            ("VERIFY_LANGUAGE", "en-us"),
        ]);
        let config = AppConfig::from_source(&lookup).unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.max_age, 300);
        assert!(!config.session.secure);
        assert_eq!(config.session.backend, SessionBackend::Redis);
        assert_eq!(config.session.auth_key.as_deref(), Some("k"));
        assert_eq!(config.provider.language, "en-us");
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let lookup = source(&[
            ("VONAGE_API_KEY", "key"),
            ("VONAGE_API_SECRET", "secret"),
            ("SERVER_PORT", "not-a-port"),
        ]);
        match AppConfig::from_source(&lookup).unwrap_err() {
            ConfigError::Invalid { key, .. } => assert_eq!(key, "SERVER_PORT"),
            other => panic!("Expected invalid value error, got {:?}", other),
        }

        let lookup = source(&[("VERIFY_PROVIDER", "twilio")]);
        assert!(matches!(
            AppConfig::from_source(&lookup),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_trusted_proxies() {
        let lookup = source(&[("VERIFY_PROVIDER", "mock")]);
        assert!(AppConfig::from_source(&lookup).unwrap().server.trusted_proxies.is_empty());

        let lookup = source(&[("VERIFY_PROVIDER", "mock"), ("TRUSTED_PROXIES", "10.0.0.1, ::1,")]);
        let proxies = AppConfig::from_source(&lookup).unwrap().server.trusted_proxies;
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[0].to_string(), "10.0.0.1");
        assert!(proxies[1].is_loopback());

        let lookup = source(&[("VERIFY_PROVIDER", "mock"), ("TRUSTED_PROXIES", "proxy.internal")]);
        match AppConfig::from_source(&lookup).unwrap_err() {
            ConfigError::Invalid { key, .. } => assert_eq!(key, "TRUSTED_PROXIES"),
            other => panic!("Expected invalid value error, got {:?}", other),
        }
    }

    #[test]
    fn test_session_max_age_bounds() {
        for value in ["59", "3601", "18446744073709551615"] {
            let lookup = source(&[("VERIFY_PROVIDER", "mock"), ("SESSION_MAX_AGE", value)]);
            match AppConfig::from_source(&lookup).unwrap_err() {
                ConfigError::Invalid { key, .. } => assert_eq!(key, "SESSION_MAX_AGE"),
                other => panic!("Expected invalid value error for {}, got {:?}", value, other),
            }
        }

        for value in ["60", "3600"] {
            let lookup = source(&[("VERIFY_PROVIDER", "mock"), ("SESSION_MAX_AGE", value)]);
            let config = AppConfig::from_source(&lookup).unwrap();
            assert_eq!(config.session.max_age.to_string(), value);
        }
    }
}
