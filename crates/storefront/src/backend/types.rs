//! Wire types exchanged with the storefront REST backend.

use chrono::{DateTime, Utc};
use cosmetica_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartState;
use crate::checkout::ShippingDetails;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub stock: u32,
}

impl Product {
    /// Price a customer pays: the sale price when set, otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether a sale price below the list price is active.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.price)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an order being placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// JSON half of the multipart order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub user_id: UserId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub shipping_details: ShippingDetails,
    pub items: Vec<OrderItemPayload>,
}

impl OrderPayload {
    /// Assemble a payload from the current cart and validated shipping data.
    #[must_use]
    pub fn from_cart(user_id: UserId, cart: &CartState, shipping: &ShippingDetails) -> Self {
        Self {
            user_id,
            total: cart.total(),
            shipping_details: shipping.clone(),
            items: cart
                .items()
                .iter()
                .map(|item| OrderItemPayload {
                    product_id: item.id,
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        }
    }
}

/// A placed order as returned by order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub shipping_details: ShippingDetails,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    #[serde(default)]
    pub payment_slip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body returned by order creation. Both flat and nested shapes are in use.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrderCreated {
    Flat { id: OrderId },
    Nested { order: OrderRef },
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderRef {
    pub id: OrderId,
}

impl OrderCreated {
    pub(crate) const fn order_id(&self) -> OrderId {
        match self {
            Self::Flat { id } | Self::Nested { order: OrderRef { id } } => *id,
        }
    }
}

/// Result of the backend connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendHealth {
    /// Health endpoint answered with a success status.
    Up,
    /// Request failed or returned an error status.
    Down(String),
    /// No answer within the probe timeout.
    TimedOut,
}

impl BackendHealth {
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_parses_backend_shape() {
        let json = r#"{
            "id": 3,
            "name": "Rose Toner",
            "price": 18.5,
            "salePrice": 15,
            "images": ["toner.jpg"],
            "category": 2,
            "stock": 0
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.effective_price(), Decimal::from(15));
        assert!(product.is_on_sale());
        assert!(!product.in_stock());
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_product_without_sale_uses_list_price() {
        let json = r#"{"id": 4, "name": "Clay Mask", "price": 22}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.sale_price, None);
        assert_eq!(product.effective_price(), Decimal::from(22));
        assert!(!product.is_on_sale());
    }

    #[test]
    fn test_order_created_accepts_both_shapes() {
        let flat: OrderCreated = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        let nested: OrderCreated =
            serde_json::from_str(r#"{"order": {"id": 13, "status": "pending"}}"#).unwrap();
        assert_eq!(flat.order_id(), OrderId::new(12));
        assert_eq!(nested.order_id(), OrderId::new(13));
    }

    #[test]
    fn test_order_history_entry_parses() {
        let json = r#"{
            "id": 9,
            "userId": 4,
            "total": 40,
            "status": "processing",
            "shippingDetails": {
                "firstName": "Ana", "lastName": "Silva", "email": "ana@example.com",
                "phone": "0771234567", "address": "1 Main St", "city": "Colombo",
                "state": "Western", "country": "Sri Lanka", "postalCode": "00100"
            },
            "items": [{"productId": 1, "name": "Cream", "quantity": 2, "price": 20}],
            "createdAt": "2026-03-01T10:00:00Z"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.payment_slip, None);
    }
}
