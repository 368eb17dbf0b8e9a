//! Catalog read endpoints, with a short-lived response cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use tracing::debug;

use oakline_core::ProductId;

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::Product;

/// How long a cached catalog response stays fresh.
const CACHE_TTL: Duration = Duration::from_secs(300);

const LIST_KEY: &str = "products";

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    product: Product,
}

#[derive(Clone)]
enum CacheValue {
    List(Arc<Vec<Product>>),
    One(Arc<Product>),
}

/// Catalog service.
///
/// Reads are cached for five minutes; admin mutations should call
/// [`ProductApi::invalidate`] so the console sees its own writes.
#[derive(Clone)]
pub struct ProductApi {
    gateway: Gateway,
    cache: Cache<String, CacheValue>,
}

impl ProductApi {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            cache: Cache::builder()
                .max_capacity(1024)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// List the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn list(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::List(products)) = self.cache.get(LIST_KEY).await {
            debug!("catalog list served from cache");
            return Ok(products);
        }

        let response: ProductsResponse = self.gateway.get("/api/products").await?;
        let products = Arc::new(response.products);
        self.cache
            .insert(LIST_KEY.to_string(), CacheValue::List(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn get(&self, id: &ProductId) -> Result<Arc<Product>, ApiError> {
        let key = format!("product:{id}");
        if let Some(CacheValue::One(product)) = self.cache.get(&key).await {
            debug!(%id, "product served from cache");
            return Ok(product);
        }

        let response: ProductResponse = self.gateway.get(&format!("/api/products/{id}")).await?;
        let product = Arc::new(response.product);
        self.cache
            .insert(key, CacheValue::One(Arc::clone(&product)))
            .await;
        Ok(product)
    }

    /// Drop every cached catalog response.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
