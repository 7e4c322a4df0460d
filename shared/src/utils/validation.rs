//! Phone number and PIN validation
//!
//! Both checks are pure predicates that run before any provider call.
//! A [`Validator`] owns its compiled patterns and is built once at start-up;
//! the free functions delegate to an immutable default instance.

use once_cell::sync::Lazy;
use regex::Regex;

/// E.164: leading `+`, first digit 1-9, 2 to 15 digits in total
pub const PHONE_PATTERN: &str = r"^\+[1-9][0-9]{1,14}$";

/// Exactly four decimal digits
///
/// Both patterns spell out `[0-9]` since `\d` is Unicode-aware in `regex`.
pub const PIN_PATTERN: &str = r"^[0-9]{4}$";

static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::new);

/// Compiled input validators for the verification forms
#[derive(Debug, Clone)]
pub struct Validator {
    phone: Regex,
    pin: Regex,
}

impl Validator {
    /// Compile the phone and PIN patterns
    pub fn new() -> Self {
        Self {
            phone: Regex::new(PHONE_PATTERN).unwrap(),
            pin: Regex::new(PIN_PATTERN).unwrap(),
        }
    }

    /// Check if a phone number is in E.164 format
    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone.is_match(phone)
    }

    /// Check if a PIN is exactly four decimal digits
    pub fn is_valid_pin(&self, pin: &str) -> bool {
        self.pin.is_match(pin)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a phone number is in E.164 format
pub fn is_valid_phone(phone: &str) -> bool {
    DEFAULT_VALIDATOR.is_valid_phone(phone)
}

/// Check if a PIN is exactly four decimal digits
pub fn is_valid_pin(pin: &str) -> bool {
    DEFAULT_VALIDATOR.is_valid_pin(pin)
}
