//! Validated E.164 phone number

use std::fmt;

use pv_shared::utils::{mask_phone_number, Validator};
use serde::Serialize;

use crate::errors::ValidationError;

/// A phone number that has passed [`Validator::is_valid_phone`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a raw form value
    pub fn parse(raw: &str, validator: &Validator) -> Result<Self, ValidationError> {
        if validator.is_valid_phone(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidPhone)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for logs
    pub fn masked(&self) -> String {
        mask_phone_number(&self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_e164() {
        let validator = Validator::new();
        let phone = PhoneNumber::parse("+14155552671", &validator).unwrap();
        assert_eq!(phone.as_str(), "+14155552671");
        assert_eq!(phone.masked(), "+14****2671");
    }

    #[test]
    fn test_parse_rejects_local_format() {
        let validator = Validator::new();
        assert_eq!(
            PhoneNumber::parse("4155552671", &validator),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            PhoneNumber::parse("+0123", &validator),
            Err(ValidationError::InvalidPhone)
        );
    }
}
