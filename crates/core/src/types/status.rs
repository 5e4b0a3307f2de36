//! Status enums for backend entities.

use serde::{Deserialize, Serialize};

/// How a storefront adds its margin on top of a bundle's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkupType {
    /// A fixed cedi amount.
    #[default]
    Fixed,
    /// A percentage of the base price.
    Percentage,
}

impl std::fmt::Display for MarkupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "FIXED"),
            Self::Percentage => write!(f, "PERCENTAGE"),
        }
    }
}

/// Outcome of a hosted payment as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Pending,
    Processing,
    Failed,
}

impl PaymentStatus {
    /// Default status when the backend only reports `success`.
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success { Self::Success } else { Self::Failed }
    }

    /// Whether the customer should keep waiting for a final result.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_type_wire_format() {
        let parsed: MarkupType = serde_json::from_str("\"PERCENTAGE\"").unwrap();
        assert_eq!(parsed, MarkupType::Percentage);
        assert_eq!(MarkupType::Fixed.to_string(), "FIXED");
    }

    #[test]
    fn test_payment_status_from_success() {
        assert_eq!(PaymentStatus::from_success(true), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_success(false), PaymentStatus::Failed);
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!("success".parse::<PaymentStatus>(), Ok(PaymentStatus::Success));
        assert_eq!("PROCESSING".parse::<PaymentStatus>(), Ok(PaymentStatus::Processing));
        assert!("abandoned".parse::<PaymentStatus>().is_err());
        assert!(PaymentStatus::Pending.is_in_progress());
        assert!(!PaymentStatus::Failed.is_in_progress());
    }
}
