//! Cosmetica Core - Shared types library.
//!
//! This crate provides common types used across all Cosmetica components:
//! - `storefront` - Cart, checkout, and the REST backend client
//! - `cli` - Command-line host for browsing, cart management, and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, phones, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
