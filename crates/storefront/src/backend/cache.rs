//! Cache types for catalog responses.

use cosmetica_core::{CategoryId, ProductId};

use super::types::{Category, Product};

/// Cache key for products and categories.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
    Categories,
    CategoryProducts(CategoryId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
}
