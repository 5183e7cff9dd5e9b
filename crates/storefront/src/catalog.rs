//! Cached product catalog.
//!
//! [`CatalogCache`] sits between route handlers and a [`ProductFetcher`]
//! (the Shopify client in production). Concurrent requests for the same key
//! share a single fetch; failed fetches are logged, answered with an empty
//! result and not cached.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use smiley_day_core::catalog::Product;
use tracing::{debug, instrument, warn};

use crate::shopify::{ShopifyError, StorefrontClient};

/// Source of catalog products.
pub trait ProductFetcher: Send + Sync + 'static {
    /// Fetch the product listing.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send;

    /// Fetch one product by handle; `Ok(None)` when it does not exist.
    fn fetch_by_handle(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<Product>, ShopifyError>> + Send;
}

impl ProductFetcher for StorefrontClient {
    async fn fetch_all(&self) -> Result<Vec<Product>, ShopifyError> {
        self.all_products().await
    }

    async fn fetch_by_handle(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        self.product_by_handle(handle).await
    }
}

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Option<Arc<Product>>),
}

/// Explicit product cache owning its fetcher.
pub struct CatalogCache<F> {
    fetcher: Arc<F>,
    cache: Cache<CacheKey, CacheValue>,
}

impl<F> std::fmt::Debug for CatalogCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl<F: ProductFetcher> CatalogCache<F> {
    /// Create a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(fetcher: F, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            fetcher: Arc::new(fetcher),
            cache,
        }
    }

    /// The product listing. Empty when the fetch fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Arc<Vec<Product>> {
        let fetcher = Arc::clone(&self.fetcher);
        let result = self
            .cache
            .try_get_with(CacheKey::Products, async move {
                debug!("Catalog cache miss, fetching products");
                fetcher
                    .fetch_all()
                    .await
                    .map(|products| CacheValue::Products(Arc::new(products)))
            })
            .await;

        match result {
            Ok(CacheValue::Products(products)) => products,
            Ok(CacheValue::Product(_)) => Arc::default(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch products");
                Arc::default()
            }
        }
    }

    /// One product by handle. `None` when it does not exist or the fetch fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_by_handle(&self, handle: &str) -> Option<Arc<Product>> {
        let fetcher = Arc::clone(&self.fetcher);
        let owned = handle.to_string();
        let result = self
            .cache
            .try_get_with(CacheKey::Product(handle.to_string()), async move {
                debug!("Catalog cache miss, fetching product");
                fetcher
                    .fetch_by_handle(&owned)
                    .await
                    .map(|product| CacheValue::Product(product.map(Arc::new)))
            })
            .await;

        match result {
            Ok(CacheValue::Product(product)) => product,
            Ok(CacheValue::Products(_)) => None,
            Err(e) => {
                warn!(error = %e, "Failed to fetch product");
                None
            }
        }
    }

    /// Drop every cached entry.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;
    use smiley_day_core::ProductId;
    use smiley_day_core::catalog::DEFAULT_COLLECTION;

    use super::*;

    fn product(handle: &str) -> Product {
        Product {
            id: ProductId::new(format!("gid://shopify/Product/{handle}")),
            title: handle.to_string(),
            handle: handle.to_string(),
            description: String::new(),
            price: Decimal::new(2500, 2),
            currency: "USD".to_string(),
            images: Vec::new(),
            colors: Vec::new(),
            color_names: Vec::new(),
            initial_color: None,
            collection: DEFAULT_COLLECTION.to_string(),
            created_at: None,
        }
    }

    /// Counts calls and fails while `failing` is set.
    #[derive(Default)]
    struct StubFetcher {
        calls: AtomicUsize,
        failing: std::sync::atomic::AtomicBool,
    }

    impl ProductFetcher for Arc<StubFetcher> {
        async fn fetch_all(&self) -> Result<Vec<Product>, ShopifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.failing.load(Ordering::SeqCst) {
                return Err(ShopifyError::RateLimited(1));
            }
            Ok(vec![product("sunflower-buddy"), product("mini-bee")])
        }

        async fn fetch_by_handle(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ShopifyError::RateLimited(1));
            }
            Ok((handle == "sunflower-buddy").then(|| product(handle)))
        }
    }

    fn cache() -> (Arc<StubFetcher>, CatalogCache<Arc<StubFetcher>>) {
        let stub = Arc::new(StubFetcher::default());
        let cache = CatalogCache::new(Arc::clone(&stub), Duration::from_secs(300));
        (stub, cache)
    }

    #[tokio::test]
    async fn test_list_products_is_cached() {
        let (stub, cache) = cache();

        assert_eq!(cache.list_products().await.len(), 2);
        assert_eq!(cache.list_products().await.len(), 2);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        cache.invalidate();
        assert_eq!(cache.list_products().await.len(), 2);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let (stub, cache) = cache();

        let (a, b, c) = tokio::join!(
            cache.list_products(),
            cache.list_products(),
            cache.list_products()
        );

        assert_eq!((a.len(), b.len(), c.len()), (2, 2, 2));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_empty_and_not_cached() {
        let (stub, cache) = cache();
        stub.failing.store(true, Ordering::SeqCst);

        assert!(cache.list_products().await.is_empty());
        assert!(cache.product_by_handle("sunflower-buddy").await.is_none());

        stub.failing.store(false, Ordering::SeqCst);
        assert_eq!(cache.list_products().await.len(), 2);
        assert!(cache.product_by_handle("sunflower-buddy").await.is_some());
    }

    #[tokio::test]
    async fn test_product_by_handle() {
        let (stub, cache) = cache();

        let found = cache.product_by_handle("sunflower-buddy").await.unwrap();
        assert_eq!(found.handle, "sunflower-buddy");
        assert!(cache.product_by_handle("nope").await.is_none());

        cache.product_by_handle("sunflower-buddy").await;
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }
}
