//! Cart commands against the file-backed cart in the data directory.

use cosmetica_core::{CurrencyCode, Price, ProductId};
use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::cart::{CartManager, CartProduct, CartState, FileStore};
use cosmetica_storefront::config::StorefrontConfig;
use rust_decimal::Decimal;
use tracing::info;

use super::write_line;

/// Load the persisted cart.
pub fn open(config: &StorefrontConfig) -> Result<CartManager<FileStore>, StorefrontError> {
    let store = FileStore::open(&config.data_dir)?;
    Ok(CartManager::load(store))
}

pub fn add(
    cart: &mut CartManager<FileStore>,
    id: ProductId,
    name: String,
    price: Decimal,
    image: Option<String>,
    quantity: i64,
) -> Result<(), StorefrontError> {
    let mut product = CartProduct::new(id, name, price);
    if let Some(image) = image {
        product = product.with_image(image);
    }
    cart.add_item(product, quantity)?;
    info!(product_id = %id, quantity, "Added to cart");
    Ok(())
}

pub fn remove(cart: &mut CartManager<FileStore>, id: ProductId) {
    cart.remove_item(id);
}

pub fn set(cart: &mut CartManager<FileStore>, id: ProductId, quantity: i64) {
    cart.update_quantity(id, quantity);
}

pub fn clear(cart: &mut CartManager<FileStore>) {
    cart.clear();
}

pub fn open_drawer(cart: &mut CartManager<FileStore>, state: Option<bool>) {
    cart.toggle_open(state);
}

/// Print the cart lines and total.
pub fn show(cart: &CartManager<FileStore>, currency: CurrencyCode) -> Result<(), StorefrontError> {
    for line in render(cart.state(), currency) {
        write_line(line)?;
    }
    Ok(())
}

fn render(state: &CartState, currency: CurrencyCode) -> Vec<String> {
    let mut lines = Vec::with_capacity(state.items().len() + 2);
    if state.is_empty() {
        lines.push("Your cart is empty".to_string());
    }
    for item in state.items() {
        lines.push(format!(
            "#{:<6} {:<32} {:>4} x {:>12} = {:>12}",
            item.id,
            item.name,
            item.quantity,
            Price::new(item.price, currency).display(),
            item.line_total()
                .map_or_else(|| "-".to_string(), |total| Price::new(total, currency).display()),
        ));
    }
    lines.push(format!(
        "Total ({} items): {}{}",
        state.item_count(),
        Price::new(state.total(), currency).display(),
        if state.is_open() { "  [open]" } else { "" },
    ));
    lines
}
