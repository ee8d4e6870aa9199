//! Catalog REST API client.
//!
//! Talks to a fakestoreapi-compatible JSON API with `reqwest` and caches
//! responses using `moka` (TTL from configuration, 5 minutes by default).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use tmi_store_core::types::{Product, ProductId};

use crate::config::CatalogConfig;

/// Errors from the catalog API boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<String>),
}

/// Client for the product catalog REST API.
///
/// Cheap to clone; all clones share one HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Fetch a path relative to the API base and deserialize the JSON body.
    ///
    /// The body is read as text first so parse failures can log what the
    /// server actually sent.
    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, path = %path, "Catalog API returned non-success status");
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Get the full product list, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.fetch("products").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown ids (the upstream API
    /// answers those with an empty or `null` body) and other variants if the
    /// request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = format!("{}/products/{id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("Product not found: {id}")));
        }
        if !status.is_success() {
            tracing::error!(status = %status, %id, "Catalog API returned non-success status");
            return Err(CatalogError::Status(status));
        }

        // Unknown ids come back 200 with an empty or "null" body.
        let body = response.text().await?;
        let product: Option<Product> = if body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&body)?
        };
        let product =
            product.ok_or_else(|| CatalogError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the products of a single category, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. An unknown category is not
    /// an error; the upstream API answers it with an empty list.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn get_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        let cache_key = format!("category:{category}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let path = format!("products/category/{}", urlencoding::encode(category));
        let products: Vec<Product> = self.fetch(&path).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get the list of category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<String>, CatalogError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self.fetch("products/categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }
}
