//! Ghana mobile phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading `0`, a network prefix digit of `2`, `3` or `5`, then 8 digits.
static GHANA_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0[235][0-9]{8}$").expect("phone pattern is a valid regex")
});

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("Phone number is required")]
    Empty,
    /// The input does not look like a Ghana mobile number.
    #[error("Invalid phone number format")]
    InvalidFormat,
}

/// A Ghana mobile number in local format, e.g. `0241234567`.
///
/// ## Constraints
///
/// - Exactly 10 ASCII digits
/// - Starts with `02`, `03` or `05`
///
/// ## Examples
///
/// ```
/// use bundle_shop_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("0241234567").is_ok());
/// assert!(PhoneNumber::parse("0551234567").is_ok());
///
/// assert!(PhoneNumber::parse("").is_err());
/// assert!(PhoneNumber::parse("0441234567").is_err()); // unknown prefix
/// assert!(PhoneNumber::parse("+233241234567").is_err()); // international form
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Example shown to users next to format errors.
    pub const EXAMPLE: &'static str = "0241234567";

    /// Parse a `PhoneNumber` from a string.
    ///
    /// The input is matched as-is; surrounding whitespace is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for an empty input and
    /// [`PhoneError::InvalidFormat`] for anything else that is not a Ghana
    /// mobile number.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !GHANA_MOBILE.is_match(s) {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
