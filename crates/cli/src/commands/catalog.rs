//! Catalog browsing.

use cosmetica_core::{CategoryId, CurrencyCode, Price, ProductId};
use cosmetica_storefront::StorefrontError;
use cosmetica_storefront::backend::{ApiClient, Product};

use super::write_line;

/// List every product, or only those in `category`.
pub async fn products(
    client: &ApiClient,
    category: Option<CategoryId>,
    currency: CurrencyCode,
) -> Result<(), StorefrontError> {
    let products = match category {
        Some(category) => client.list_products_by_category(category).await?,
        None => client.list_products().await?,
    };

    if products.is_empty() {
        write_line("No products found")?;
    }
    for product in &products {
        write_line(summary(product, currency))?;
    }
    Ok(())
}

/// Show a single product with its description and images.
pub async fn product(
    client: &ApiClient,
    id: ProductId,
    currency: CurrencyCode,
) -> Result<(), StorefrontError> {
    let product = client.get_product(id).await?;

    write_line(summary(&product, currency))?;
    if !product.description.is_empty() {
        write_line(&product.description)?;
    }
    for image in &product.images {
        write_line(format_args!("  image: {image}"))?;
    }
    Ok(())
}

pub async fn categories(client: &ApiClient) -> Result<(), StorefrontError> {
    for category in client.list_categories().await? {
        match category.description {
            Some(description) => {
                write_line(format_args!("#{:<6} {} - {description}", category.id, category.name))?;
            }
            None => write_line(format_args!("#{:<6} {}", category.id, category.name))?,
        }
    }
    Ok(())
}

fn summary(product: &Product, currency: CurrencyCode) -> String {
    let price = Price::new(product.effective_price(), currency);
    let mut line = format!("#{:<6} {:<32} {:>12}", product.id, product.name, price.display());
    if product.is_on_sale() {
        line.push_str(&format!(" (was {})", Price::new(product.price, currency).display()));
    }
    if !product.in_stock() {
        line.push_str(" [out of stock]");
    }
    line
}
