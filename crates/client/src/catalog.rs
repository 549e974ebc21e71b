//! Catalog read API client.
//!
//! Uses `reqwest` for HTTP and caches decoded responses with `moka`
//! (5-minute TTL), since the catalog is a fixed dataset.
//!
//! # Example
//!
//! ```rust,ignore
//! use boutique_client::CatalogClient;
//!
//! let catalog = CatalogClient::new(config.api_url.clone());
//!
//! // Typed access with errors
//! let products = catalog.products().await?;
//! let results = catalog.search("sweater").await?;
//!
//! // Page load: never fails, missing lists come back empty
//! let snapshot = catalog.snapshot().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use boutique_core::{
    CategoriesResponse, Category, ExpandedProduct, Product, ProductsResponse, Promotion,
    PromotionsResponse,
};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{ClientConfig, parse_base_url};

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 256;

/// Errors that can occur when reading the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Search(String),
    Categories,
    Promotions,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Search(Vec<ExpandedProduct>),
    Categories(Vec<Category>),
    Promotions(Vec<Promotion>),
}

/// Every list needed to render a catalog page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub promotions: Vec<Promotion>,
}

/// Client for the catalog read API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        // Keep the base path when joining relative endpoints.
        let base_url = parse_base_url(base_url.as_str()).unwrap_or(base_url);

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    /// All products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint("api/products")?;
        let response: ProductsResponse = self.get_json(url).await?;
        self.inner
            .cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(response.products.clone()),
            )
            .await;

        Ok(response.products)
    }

    /// Search products and their variants by localized name.
    ///
    /// When nothing matches the API answers with its best-stocked products
    /// instead, so this only comes back empty for an empty catalog. A blank
    /// term lists every product and variant.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<ExpandedProduct>, CatalogError> {
        if term.trim().is_empty() {
            let products = self.products().await?;
            return Ok(products.iter().flat_map(Product::expand).collect());
        }

        let key = CacheKey::Search(term.to_owned());
        if let Some(CacheValue::Search(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for search");
            return Ok(products);
        }

        let mut url = self.endpoint("api/products")?;
        url.query_pairs_mut().append_pair("q", term);
        let response: ProductsResponse<ExpandedProduct> = self.get_json(url).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Search(response.products.clone()))
            .await;

        Ok(response.products)
    }

    /// All product categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint("api/categories")?;
        let response: CategoriesResponse = self.get_json(url).await?;
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(response.categories.clone()),
            )
            .await;

        Ok(response.categories)
    }

    /// All promotional spots.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn promotions(&self) -> Result<Vec<Promotion>, CatalogError> {
        if let Some(CacheValue::Promotions(promotions)) =
            self.inner.cache.get(&CacheKey::Promotions).await
        {
            debug!("Cache hit for promotions");
            return Ok(promotions);
        }

        let url = self.endpoint("api/promotions")?;
        let response: PromotionsResponse = self.get_json(url).await?;
        self.inner
            .cache
            .insert(
                CacheKey::Promotions,
                CacheValue::Promotions(response.promotional_spots.clone()),
            )
            .await;

        Ok(response.promotional_spots)
    }

    /// Fetch products, categories and promotions concurrently.
    ///
    /// A list that fails to load is logged and replaced by an empty one, so
    /// a page can always render.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> CatalogSnapshot {
        let (products, categories, promotions) =
            tokio::join!(self.products(), self.categories(), self.promotions());

        CatalogSnapshot {
            products: products.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to fetch products");
                Vec::new()
            }),
            categories: categories.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to fetch categories");
                Vec::new()
            }),
            promotions: promotions.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to fetch promotions");
                Vec::new()
            }),
        }
    }

    /// Drop every cached response.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = CatalogClient::new(Url::parse("https://shop.example.com/store").unwrap());
        assert_eq!(
            client.endpoint("api/products").unwrap().as_str(),
            "https://shop.example.com/store/api/products"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = CatalogError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "http://localhost/api/products".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 502 Bad Gateway from http://localhost/api/products"
        );
    }

    #[tokio::test]
    async fn test_snapshot_degrades_to_empty_lists() {
        // Nothing listens on port 1.
        let client = CatalogClient::new(Url::parse("http://127.0.0.1:1/").unwrap());

        let snapshot = client.snapshot().await;
        assert_eq!(snapshot, CatalogSnapshot::default());
        assert!(client.products().await.is_err());
    }
}
