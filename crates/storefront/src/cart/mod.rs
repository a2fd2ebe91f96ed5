//! Shopping cart state manager.
//!
//! The cart is a single [`CartState`] owned by a [`CartManager`]. Every
//! operation mutates the state synchronously, recomputes the total from
//! scratch, and writes the full snapshot back through the injected
//! [`KeyValueStore`] under [`CART_STORAGE_KEY`].
//!
//! # Example
//!
//! ```rust
//! use cosmetica_core::ProductId;
//! use cosmetica_storefront::cart::{CartManager, CartProduct, MemoryStore};
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartManager::load(MemoryStore::new());
//! let cream = CartProduct::new(ProductId::new(1), "Cream", Decimal::from(20));
//!
//! cart.add_item(cream.clone(), 2).unwrap();
//! cart.add_item(cream, 3).unwrap();
//!
//! assert_eq!(cart.state().items().len(), 1);
//! assert_eq!(cart.state().total(), Decimal::from(100));
//! ```

mod money;
pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use cosmetica_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::backend::Product;

/// Storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors raised when an operation is called with input the cart refuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Quantity passed to an add was below 1.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    /// Unit price was negative.
    #[error("price for product {id} cannot be negative (got {price})")]
    NegativePrice { id: ProductId, price: Decimal },

    /// Adding the product would push the cart total past what a decimal holds.
    #[error("cart total would overflow when adding product {0}")]
    TotalOverflow(ProductId),
}

/// The product fields needed to put something in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    /// Unit price already resolved (sale price if the product has one).
    pub price: Decimal,
    pub image: Option<String>,
}

impl CartProduct {
    /// Create a cart product without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.effective_price(),
            image: product.images.first().cloned(),
        }
    }
}

/// One product-quantity pairing in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "money")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLineItem {
    /// `price * quantity` for this line, `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Cart contents, panel visibility, and the derived total.
///
/// Fields are private so the total can only change through the operations
/// that also recompute it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    items: Vec<CartLineItem>,
    #[serde(default)]
    is_open: bool,
    #[serde(default, with = "money")]
    total: Decimal,
}

impl CartState {
    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart side panel is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Sum of `price * quantity` over all items.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of quantities (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Serialize to the snapshot format kept in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_snapshot(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and normalize a stored snapshot.
    ///
    /// The stored total is ignored and recomputed, duplicate ids are merged,
    /// and quantities below 1 are raised to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a line has a negative price,
    /// or the total does not fit in a decimal.
    pub fn from_snapshot(raw: &str) -> Result<Self, StorageError> {
        let parsed: Self = serde_json::from_str(raw)?;

        let mut state = Self {
            items: Vec::with_capacity(parsed.items.len()),
            is_open: parsed.is_open,
            total: Decimal::ZERO,
        };
        for mut item in parsed.items {
            if item.price < Decimal::ZERO {
                return Err(StorageError::InvalidSnapshot(format!(
                    "product {} has negative price {}",
                    item.id, item.price
                )));
            }
            item.quantity = item.quantity.max(1);
            match state.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => state.items.push(item),
            }
        }
        if state.recompute_total().is_none() {
            return Err(StorageError::InvalidSnapshot(
                "cart total overflows".to_string(),
            ));
        }
        Ok(state)
    }

    /// Merge a product into the cart. Leaves `self` untouched on overflow.
    fn add(&mut self, product: CartProduct, quantity: u32) -> Result<(), CartError> {
        let id = product.id;
        let mut next = self.clone();
        match next.items.iter_mut().find(|item| item.id == id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => next.items.push(CartLineItem {
                id,
                name: product.name,
                price: product.price,
                image: product.image,
                quantity,
            }),
        }
        next.is_open = true;
        next.recompute_total().ok_or(CartError::TotalOverflow(id))?;
        *self = next;
        Ok(())
    }

    fn remove(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
        // A subset of a finite non-negative sum cannot overflow.
        let _ = self.recompute_total();
    }

    /// Set a line's quantity. Returns `false` and changes nothing when the
    /// new total would overflow.
    fn set_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        let mut next = self.clone();
        if let Some(item) = next.items.iter_mut().find(|item| item.id == id) {
            item.quantity = clamped;
        }
        if next.recompute_total().is_none() {
            return false;
        }
        *self = next;
        true
    }

    fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }

    fn toggle_open(&mut self, open: Option<bool>) {
        self.is_open = open.unwrap_or(!self.is_open);
    }

    /// Sum line totals into `total`. Returns `None`, leaving `total` as it
    /// was, if any product or the sum overflows.
    fn recompute_total(&mut self) -> Option<Decimal> {
        let total = self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?)
        })?;
        self.total = total;
        Some(total)
    }
}

/// Owns the cart state and persists it after every operation.
#[derive(Debug)]
pub struct CartManager<S> {
    state: CartState,
    store: S,
}

impl<S: KeyValueStore> CartManager<S> {
    /// Load the cart from storage.
    ///
    /// Falls back to an empty cart when the snapshot is missing, cannot be
    /// read, or does not parse.
    pub fn load(store: S) -> Self {
        let state = match store.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => CartState::from_snapshot(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable cart snapshot");
                CartState::default()
            }),
            Ok(None) => CartState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart snapshot, starting empty");
                CartState::default()
            }
        };

        debug!(
            items = state.items.len(),
            total = %state.total,
            "Cart loaded"
        );
        Self { state, store }
    }

    /// Current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Access the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// Opens the cart panel.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a quantity below 1 and
    /// [`CartError::NegativePrice`] for a negative unit price, and
    /// [`CartError::TotalOverflow`] when the new total would not fit in a
    /// decimal. The cart is left unchanged in all cases.
    pub fn add_item(&mut self, product: CartProduct, quantity: i64) -> Result<&CartState, CartError> {
        let quantity = match u32::try_from(quantity) {
            Ok(q) if q >= 1 => q,
            Ok(_) => return Err(CartError::InvalidQuantity(quantity)),
            Err(_) if quantity > 0 => u32::MAX,
            Err(_) => return Err(CartError::InvalidQuantity(quantity)),
        };
        if product.price < Decimal::ZERO {
            return Err(CartError::NegativePrice {
                id: product.id,
                price: product.price,
            });
        }

        debug!(product_id = %product.id, quantity, "Adding item to cart");
        self.state.add(product, quantity)?;
        self.persist();
        Ok(&self.state)
    }

    /// Remove a product's line. No-op when the product is not in the cart.
    pub fn remove_item(&mut self, id: ProductId) -> &CartState {
        debug!(product_id = %id, "Removing item from cart");
        self.state.remove(id);
        self.persist();
        &self.state
    }

    /// Set a line's quantity, clamped to at least 1.
    ///
    /// No-op when the product is not in the cart, or when the new quantity
    /// would make the total overflow.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> &CartState {
        debug!(product_id = %id, quantity, "Updating cart quantity");
        if !self.state.set_quantity(id, quantity) {
            warn!(product_id = %id, quantity, "Quantity would overflow the cart total, keeping line as is");
            return &self.state;
        }
        self.persist();
        &self.state
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> &CartState {
        debug!("Clearing cart");
        self.state.clear();
        self.persist();
        &self.state
    }

    /// Show or hide the cart panel; flips it when `open` is `None`.
    pub fn toggle_open(&mut self, open: Option<bool>) -> &CartState {
        self.state.toggle_open(open);
        self.persist();
        &self.state
    }

    /// Write the snapshot. Failures are logged and the in-memory state stays
    /// authoritative.
    fn persist(&self) {
        let result = self
            .state
            .to_snapshot()
            .and_then(|snapshot| self.store.set(CART_STORAGE_KEY, &snapshot));
        if let Err(e) = result {
            error!(error = %e, "Failed to persist cart snapshot");
        }
    }
}
