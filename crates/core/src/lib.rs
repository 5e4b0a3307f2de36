//! Bundle Shop Core - Validated domain types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! - `storefront` - Public-facing data bundle storefront
//! - `integration-tests` - End-to-end flows against a stub backend
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. Everything that can be rejected before a network call is
//! rejected here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for phone numbers, emails, passwords,
//!   amounts, prices, IDs and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
