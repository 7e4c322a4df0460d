use pv_shared::config::{AppConfig, ConfigError};
use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration: the shared application settings plus the options
/// only the binary cares about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    /// PIN accepted by the mock provider (`MOCK_VERIFY_PIN`)
    pub mock_pin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig::from_env()?,
            mock_pin: env::var("MOCK_VERIFY_PIN").ok().filter(|pin| !pin.is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.is_production()
    }
}
