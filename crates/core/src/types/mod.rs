//! Core types for Bundle Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amount;
pub mod email;
pub mod id;
pub mod password;
pub mod phone;
pub mod price;
pub mod status;

pub use amount::{TopupAmount, TopupAmountError};
pub use email::{Email, EmailError};
pub use id::*;
pub use password::{NewPassword, PasswordError};
pub use phone::{PhoneError, PhoneNumber};
pub use price::{Price, PriceError};
pub use status::*;
