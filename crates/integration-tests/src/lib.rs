//! Integration tests for the Cosmetica storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cosmetica-integration-tests
//! ```
//!
//! Everything runs in-process: carts persist to temporary directories and the
//! REST backend is an `httpmock` server or the [`RecordingBackend`] fake.
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart operations through the file store
//! - `checkout_flow` - Details, payment and confirmation against a fake backend
//! - `backend_client` - `ApiClient` against a mock HTTP server

use std::sync::Mutex;
use std::time::Duration;

use cosmetica_core::{OrderId, ProductId};
use cosmetica_storefront::backend::{ApiClient, BackendError, OrderBackend, OrderPayload};
use cosmetica_storefront::cart::CartProduct;
use cosmetica_storefront::checkout::{PaymentSlip, ShippingForm};
use cosmetica_storefront::config::BackendConfig;
use rust_decimal::Decimal;
use secrecy::SecretString;

/// A product with a whole-number price.
#[must_use]
pub fn product(id: i64, name: &str, price: i64) -> CartProduct {
    CartProduct::new(ProductId::new(id), name, Decimal::from(price))
}

/// A shipping form that passes validation.
#[must_use]
pub fn complete_form() -> ShippingForm {
    ShippingForm {
        first_name: "Nadia".to_string(),
        last_name: "Perera".to_string(),
        email: "nadia@example.com".to_string(),
        phone: "0771234567".to_string(),
        address: "12 Lotus Road".to_string(),
        city: "Kandy".to_string(),
        state: "Central".to_string(),
        country: "Sri Lanka".to_string(),
        postal_code: "20000".to_string(),
    }
}

/// A small non-empty slip image.
#[must_use]
pub fn slip() -> PaymentSlip {
    PaymentSlip::new("slip.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

/// Client pointed at `base_url` with an optional bearer token.
///
/// # Panics
///
/// Panics if `base_url` is not a valid http URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn api_client(base_url: &str, token: Option<&str>) -> ApiClient {
    let config = BackendConfig::new(
        base_url,
        token.map(SecretString::from),
        Duration::from_millis(500),
    )
    .unwrap();
    ApiClient::new(&config).unwrap()
}

/// In-process order backend that records what it was sent.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    orders: Mutex<Vec<(OrderPayload, String)>>,
    receipts: Mutex<Vec<OrderId>>,
    fail_orders: bool,
    fail_receipts: bool,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every order with a 500.
    #[must_use]
    pub fn failing_orders() -> Self {
        Self {
            fail_orders: true,
            ..Self::default()
        }
    }

    /// Accept orders but fail every receipt request.
    #[must_use]
    pub fn failing_receipts() -> Self {
        Self {
            fail_receipts: true,
            ..Self::default()
        }
    }

    /// Orders received so far, with the slip file name.
    #[must_use]
    pub fn orders(&self) -> Vec<(OrderPayload, String)> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn receipts(&self) -> Vec<OrderId> {
        self.receipts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl OrderBackend for RecordingBackend {
    async fn create_order(
        &self,
        payload: &OrderPayload,
        slip: &PaymentSlip,
    ) -> Result<OrderId, BackendError> {
        if self.fail_orders {
            return Err(BackendError::Api {
                status: 500,
                message: "Order service unavailable".to_string(),
            });
        }
        let mut orders = self
            .orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        orders.push((payload.clone(), slip.file_name().to_string()));
        let id = i64::try_from(orders.len()).unwrap_or(i64::MAX) + 1000;
        Ok(OrderId::new(id))
    }

    async fn generate_receipt(&self, order_id: OrderId) -> Result<(), BackendError> {
        if self.fail_receipts {
            return Err(BackendError::Api {
                status: 502,
                message: "Receipt renderer offline".to_string(),
            });
        }
        self.receipts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(order_id);
        Ok(())
    }
}
