//! Wallet topup amount.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TopupAmount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TopupAmountError {
    /// No amount was submitted.
    #[error("Amount is required")]
    Missing,
    /// The amount is not a number or is below the minimum.
    #[error("Minimum topup amount is GHS 10")]
    BelowMinimum,
    /// The amount is above the maximum.
    #[error("Maximum topup amount is GHS 10,000")]
    AboveMaximum,
}

/// An amount of Ghana cedis to add to a wallet, between GHS 10 and GHS 10,000
/// inclusive.
///
/// The amount is kept as the text the customer typed (trimmed) because the
/// backend expects the decimal as a string. Scientific notation is expanded.
///
/// ## Examples
///
/// ```
/// use bundle_shop_core::{TopupAmount, TopupAmountError};
///
/// assert!(TopupAmount::parse("10").is_ok());
/// assert!(TopupAmount::parse("10000.00").is_ok());
/// assert_eq!(TopupAmount::parse("abc"), Err(TopupAmountError::BelowMinimum));
/// assert_eq!(TopupAmount::parse("5"), Err(TopupAmountError::BelowMinimum));
/// assert_eq!(TopupAmount::parse("10001"), Err(TopupAmountError::AboveMaximum));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopupAmount(String);

impl TopupAmount {
    /// Smallest accepted topup.
    pub const MIN: Decimal = Decimal::TEN;

    /// Largest accepted topup.
    pub const MAX: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

    /// Parse a topup amount from form input.
    ///
    /// # Errors
    ///
    /// - [`TopupAmountError::Missing`] for blank input
    /// - [`TopupAmountError::BelowMinimum`] when the input is not a number or
    ///   is below GHS 10
    /// - [`TopupAmountError::AboveMaximum`] when above GHS 10,000
    pub fn parse(s: &str) -> Result<Self, TopupAmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TopupAmountError::Missing);
        }

        let (value, text) = match Decimal::from_str(trimmed) {
            Ok(value) => (value, trimmed.to_owned()),
            Err(_) => {
                let value = Self::parse_wide(trimmed)?;
                (value, value.to_string())
            }
        };

        if value < Self::MIN {
            return Err(TopupAmountError::BelowMinimum);
        }
        if value > Self::MAX {
            return Err(TopupAmountError::AboveMaximum);
        }

        Ok(Self(text))
    }

    /// Parse scientific notation or numbers too long for a plain decimal.
    ///
    /// The range is checked on the float first so only in-range values reach
    /// `Decimal::from_scientific`.
    fn parse_wide(s: &str) -> Result<Decimal, TopupAmountError> {
        match s.parse::<f64>() {
            Ok(v) if v > 10_000.0 => Err(TopupAmountError::AboveMaximum),
            Ok(v) if v >= 10.0 => {
                Decimal::from_scientific(s).map_err(|_| TopupAmountError::BelowMinimum)
            }
            _ => Err(TopupAmountError::BelowMinimum),
        }
    }

    /// The amount as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopupAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
