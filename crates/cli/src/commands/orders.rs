//! Order history.

use cosmetica_core::{CurrencyCode, Price, UserId};
use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::backend::ApiClient;

use super::write_line;

pub async fn list(
    client: &ApiClient,
    user_id: UserId,
    currency: CurrencyCode,
) -> Result<(), StorefrontError> {
    cosmetica_storefront::error::set_sentry_user(&user_id);

    let orders = client.list_orders_for_user(user_id).await?;
    if orders.is_empty() {
        write_line("No orders yet")?;
    }
    for order in orders {
        write_line(format_args!(
            "Order #{} {} {:<10} {:>12} ({} items)",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.status,
            Price::new(order.total, currency).display(),
            order.items.len(),
        ))?;
    }
    Ok(())
}
