//! Ghana cedi price represented with decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("invalid price: {0:?}")]
    Invalid(String),
}

/// A price in Ghana cedis.
///
/// The backend sends prices as decimal text (`"12.5"`); this type parses them
/// for comparison and display.
///
/// ```
/// use bundle_shop_core::Price;
///
/// let price: Price = "12.5".parse().unwrap();
/// assert_eq!(price.to_string(), "GHS 12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// ISO 4217 code of the storefront currency.
    pub const CURRENCY_CODE: &'static str = "GHS";

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price from backend text.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the text is not a decimal number.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `GHS 12.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", Self::CURRENCY_CODE, self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Price::parse("5").unwrap().to_string(), "GHS 5.00");
        assert_eq!(Price::parse("12.5").unwrap().to_string(), "GHS 12.50");
        assert_eq!(Price::parse(" 7.25 ").unwrap().to_string(), "GHS 7.25");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Price::parse("free"), Err(PriceError::Invalid(_))));
        assert!(Price::parse("").is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        // "10" sorts after "9" numerically, unlike string comparison
        assert!(Price::parse("9").unwrap() < Price::parse("10").unwrap());
        assert!(Price::parse("10.00").unwrap() == Price::parse("10").unwrap());
    }
}
