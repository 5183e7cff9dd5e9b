//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogCache;
use crate::config::{MissingShopifyConfig, StorefrontConfig};
use crate::error::AppError;
use crate::shopify::StorefrontClient;

/// Catalog cache over the Shopify client.
pub type Catalog = CatalogCache<StorefrontClient>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the product catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Result<Catalog, MissingShopifyConfig>,
}

impl AppState {
    /// Create the application state, building the Shopify client when
    /// credentials are configured.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = config.shopify.as_ref().map_err(|missing| *missing).map(|shopify| {
            let client = StorefrontClient::new(shopify, config.catalog.page_size);
            CatalogCache::new(client, config.catalog.cache_ttl)
        });

        Self::with_catalog(config, catalog)
    }

    /// Create the application state around an existing catalog.
    #[must_use]
    pub fn with_catalog(
        config: StorefrontConfig,
        catalog: Result<Catalog, MissingShopifyConfig>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the product catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when Shopify credentials are missing.
    pub fn catalog(&self) -> Result<&Catalog, AppError> {
        self.inner.catalog.as_ref().map_err(|missing| {
            tracing::error!(
                has_store_domain = missing.has_store_domain,
                has_access_token = missing.has_access_token,
                "Missing Shopify environment variables"
            );
            AppError::Config(*missing)
        })
    }
}
