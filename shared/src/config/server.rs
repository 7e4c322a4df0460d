//! Server configuration module

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::{parse_or, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Reverse proxies allowed to report the original scheme
    #[serde(default)]
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 1323,
            workers: 0,
            trusted_proxies: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load `SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS` and `TRUSTED_PROXIES`
    pub fn from_source<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup, "SERVER_PORT", defaults.port)?,
            workers: parse_or(lookup, "SERVER_WORKERS", defaults.workers)?,
            trusted_proxies: parse_trusted_proxies(lookup)?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Comma-separated IP addresses, blanks ignored
fn parse_trusted_proxies<F>(lookup: &F) -> Result<Vec<IpAddr>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("TRUSTED_PROXIES")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|proxy| !proxy.is_empty())
        .map(|proxy| {
            proxy.parse().map_err(|_| ConfigError::Invalid {
                key: "TRUSTED_PROXIES".to_string(),
                message: format!("not an IP address: {}", proxy),
            })
        })
        .collect()
}
