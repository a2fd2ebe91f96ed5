//! Cosmetica storefront client library.
//!
//! Holds the customer-facing state of the shop: the persisted shopping cart,
//! the two-step bank-transfer checkout, and the REST client that talks to the
//! order backend. Hosts (the `cosmetica` CLI, tests) drive these through
//! [`cart::CartManager`] and [`checkout::CheckoutFlow`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;

pub use error::{Result, StorefrontError};
