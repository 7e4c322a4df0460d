//! Verification provider implementations
//!
//! - `vonage` - Vonage Verify API client over HTTPS
//! - `mock_provider` - in-process provider for local development

pub mod mock_provider;
pub mod vonage;


pub use mock_provider::{MockVerifyProvider, DEFAULT_MOCK_PIN};
pub use vonage::{VonageConfig, VonageVerifyClient};
