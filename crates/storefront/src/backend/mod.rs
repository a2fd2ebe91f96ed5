//! REST backend client.
//!
//! # Architecture
//!
//! - The backend owns products, categories, orders, and file storage; this
//!   crate keeps no copy beyond a short-lived in-memory cache
//! - Catalog reads (products, categories) are cached via `moka` (5 minute TTL)
//! - Orders are submitted as multipart forms: a JSON `orderData` field plus
//!   the `paymentSlip` image
//! - Checkout depends on the [`OrderBackend`] port rather than on
//!   [`ApiClient`] directly, so tests can swap in fakes
//!
//! # Example
//!
//! ```rust,ignore
//! use cosmetica_storefront::backend::ApiClient;
//!
//! let client = ApiClient::new(&config.backend)?;
//!
//! let products = client.list_products().await?;
//! let categories = client.list_categories().await?;
//! let history = client.list_orders_for_user(user_id).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use std::future::Future;

use cosmetica_core::OrderId;
use thiserror::Error;

use crate::checkout::PaymentSlip;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with an error status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The order operations checkout needs from the backend.
pub trait OrderBackend {
    /// Submit an order with its payment slip and return the new order's id.
    fn create_order(
        &self,
        payload: &OrderPayload,
        slip: &PaymentSlip,
    ) -> impl Future<Output = Result<OrderId, BackendError>> + Send;

    /// Ask the backend to produce a receipt for a placed order.
    fn generate_receipt(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Pull a human-readable message out of an error response body.
///
/// Looks for `message` or `error` string fields and falls back to the first
/// 200 characters of the raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(message) = value.get(field).and_then(serde_json::Value::as_str) {
                return message.to_string();
            }
        }
    }
    body.chars().take(200).collect()
}
