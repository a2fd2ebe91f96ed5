//! HTTP client for the storefront REST backend.

use std::sync::Arc;
use std::time::Duration;

use cosmetica_core::{CategoryId, OrderId, ProductId, UserId};
use moka::future::Cache;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::types::{BackendHealth, Category, Order, OrderCreated, OrderPayload, Product};
use super::{BackendError, OrderBackend, error_message};
use crate::checkout::PaymentSlip;
use crate::config::BackendConfig;

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 500;

/// Client for the storefront REST backend.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    probe_timeout: Duration,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cosmetica-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                probe_timeout: config.probe_timeout,
                cache,
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a relative endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.api_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, builder: RequestBuilder) -> Result<String, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(url.path().to_string()));
        }

        if !status.is_success() {
            error!(
                status = %status,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// Send a request and parse the JSON body.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        let body = self.send(builder).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint("products")?;
        let products: Vec<Product> = self.execute(self.request(Method::GET, url)).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, BackendError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{id}"))?;
        let product: Product = self.execute(self.request(Method::GET, url)).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint("categories")?;
        let categories: Vec<Category> = self.execute(self.request(Method::GET, url)).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// List the products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn list_products_by_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<Product>, BackendError> {
        let key = CacheKey::CategoryProducts(id);
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let url = self.endpoint(&format!("categories/{id}/products"))?;
        let products: Vec<Product> = self.execute(self.request(Method::GET, url)).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Order history for a user, newest first as the backend returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, BackendError> {
        let url = self.endpoint(&format!("orders/user/{user_id}"))?;
        self.execute(self.request(Method::GET, url)).await
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check that the backend answers, giving up after the probe timeout.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> BackendHealth {
        let url = match self.endpoint("health") {
            Ok(url) => url,
            Err(e) => return BackendHealth::Down(e.to_string()),
        };

        let request = self.request(Method::GET, url).send();
        match tokio::time::timeout(self.inner.probe_timeout, request).await {
            Ok(Ok(response)) if response.status().is_success() => BackendHealth::Up,
            Ok(Ok(response)) => BackendHealth::Down(format!("HTTP {}", response.status())),
            Ok(Err(e)) => BackendHealth::Down(e.to_string()),
            Err(_) => {
                warn!(
                    timeout_ms = u64::try_from(self.inner.probe_timeout.as_millis()).unwrap_or(u64::MAX),
                    "Backend probe timed out"
                );
                BackendHealth::TimedOut
            }
        }
    }
}

impl OrderBackend for ApiClient {
    #[instrument(skip(self, payload, slip), fields(user_id = %payload.user_id, items = payload.items.len()))]
    async fn create_order(
        &self,
        payload: &OrderPayload,
        slip: &PaymentSlip,
    ) -> Result<OrderId, BackendError> {
        let slip_part = Part::bytes(slip.bytes().to_vec())
            .file_name(slip.file_name().to_string())
            .mime_str(slip.content_type())?;

        let form = Form::new()
            .text("orderData", serde_json::to_string(payload)?)
            .part("paymentSlip", slip_part);

        let url = self.endpoint("orders")?;
        let created: OrderCreated = self
            .execute(self.request(Method::POST, url).multipart(form))
            .await?;

        let order_id = created.order_id();
        debug!(order_id = %order_id, "Order created");
        Ok(order_id)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn generate_receipt(&self, order_id: OrderId) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("orders/{order_id}/receipt"))?;
        self.send(self.request(Method::POST, url)).await?;
        Ok(())
    }
}
