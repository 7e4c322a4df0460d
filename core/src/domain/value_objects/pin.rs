//! Validated four digit PIN

use pv_shared::utils::Validator;

use crate::errors::ValidationError;

/// A PIN that has passed [`Validator::is_valid_pin`]
///
/// `Debug` is redacted so PINs never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Validate a raw form value
    pub fn parse(raw: &str, validator: &Validator) -> Result<Self, ValidationError> {
        if validator.is_valid_pin(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidPin)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pin(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let validator = Validator::new();
        assert_eq!(Pin::parse("1234", &validator).unwrap().as_str(), "1234");
        assert_eq!(Pin::parse("123", &validator), Err(ValidationError::InvalidPin));
        assert_eq!(Pin::parse("12a4", &validator), Err(ValidationError::InvalidPin));
    }

    #[test]
    fn test_debug_is_redacted() {
        let pin = Pin::parse("4321", &Validator::new()).unwrap();
        assert_eq!(format!("{:?}", pin), "Pin(****)");
    }
}
