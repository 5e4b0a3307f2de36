//! Password rules applied before registration and password reset.

use core::fmt;

/// Errors that can occur when validating a [`NewPassword`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The password is shorter than [`NewPassword::MIN_LENGTH`].
    #[error("Password must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The confirmation field differs from the password.
    #[error("Passwords do not match")]
    Mismatch,
}

/// A password chosen by the customer, checked against its confirmation.
///
/// `Debug` and `Display` never reveal the value.
///
/// ## Examples
///
/// ```
/// use bundle_shop_core::{NewPassword, PasswordError};
///
/// assert!(NewPassword::parse("secret1", "secret1").is_ok());
/// assert_eq!(
///     NewPassword::parse("abc", "abc").unwrap_err(),
///     PasswordError::TooShort { min: 6 }
/// );
/// assert_eq!(
///     NewPassword::parse("secret1", "secret2").unwrap_err(),
///     PasswordError::Mismatch
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    /// Minimum password length in characters.
    pub const MIN_LENGTH: usize = 6;

    /// Validate a password and its confirmation.
    ///
    /// Length is checked first, then the confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::TooShort`] if the password has fewer than six
    /// characters and [`PasswordError::Mismatch`] if the confirmation differs.
    pub fn parse(password: &str, confirmation: &str) -> Result<Self, PasswordError> {
        Self::check_length(password)?;

        if password != confirmation {
            return Err(PasswordError::Mismatch);
        }

        Ok(Self(password.to_owned()))
    }

    /// Check only the length rule.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::TooShort`] if the password is too short.
    pub fn check_length(password: &str) -> Result<(), PasswordError> {
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        Ok(())
    }

    /// Expose the password for sending to the backend.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword([REDACTED])")
    }
}
