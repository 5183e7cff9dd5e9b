//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., smiley-day.myshopify.com)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API access token
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-10)
//! - `CATALOG_PAGE_SIZE` - Products fetched for the listing (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//!
//! The server starts without Shopify credentials. Catalog routes then answer
//! with a configuration error that says which variables are missing.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default Storefront API version.
pub const DEFAULT_API_VERSION: &str = "2025-10";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Shopify Storefront API configuration, or what is missing from it
    pub shopify: Result<ShopifyStorefrontConfig, MissingShopifyConfig>,
    /// Catalog fetch and cache settings
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., smiley-day.myshopify.com)
    pub store_domain: String,
    /// Shopify API version (e.g., 2025-10)
    pub api_version: String,
    /// Storefront API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyStorefrontConfig {
    /// GraphQL endpoint for this store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let domain = self
            .store_domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!("https://{domain}/api/{}/graphql.json", self.api_version)
    }
}

/// Which Shopify variables were usable when the config was loaded.
///
/// Carries presence flags only, never values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingShopifyConfig {
    pub has_store_domain: bool,
    pub has_access_token: bool,
}

impl MissingShopifyConfig {
    /// Human-readable summary for error responses.
    #[must_use]
    pub fn details(&self) -> String {
        format!(
            "SHOPIFY_STORE_DOMAIN and SHOPIFY_STOREFRONT_ACCESS_TOKEN must be set. \
             Found: SHOPIFY_STORE_DOMAIN={}, SHOPIFY_STOREFRONT_ACCESS_TOKEN={}",
            self.has_store_domain, self.has_access_token
        )
    }
}

/// Catalog fetch and cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Number of products requested for the listing
    pub page_size: u32,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    /// Missing Shopify credentials are not an error here.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = Url::parse(&get_env_or_default(
            "STOREFRONT_BASE_URL",
            "http://localhost:3000",
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string()))?;

        let shopify = ShopifyStorefrontConfig::resolve(
            get_optional_env("SHOPIFY_STORE_DOMAIN"),
            get_optional_env("SHOPIFY_STOREFRONT_ACCESS_TOKEN"),
            get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
        );
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            shopify,
            catalog,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether requests go over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl ShopifyStorefrontConfig {
    /// Pair up the store domain and token. Both must be present and the token
    /// must not look like a placeholder.
    ///
    /// # Errors
    ///
    /// Returns which of the two values were usable when either is not.
    pub fn resolve(
        store_domain: Option<String>,
        access_token: Option<String>,
        api_version: String,
    ) -> Result<Self, MissingShopifyConfig> {
        let access_token = access_token.filter(|t| !is_placeholder(t));

        match (store_domain, access_token) {
            (Some(store_domain), Some(token)) => Ok(Self {
                store_domain,
                api_version,
                access_token: SecretString::from(token),
            }),
            (store_domain, token) => Err(MissingShopifyConfig {
                has_store_domain: store_domain.is_some(),
                has_access_token: token.is_some(),
            }),
        }
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let page_size = match get_optional_env("CATALOG_PAGE_SIZE") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_PAGE_SIZE".to_string(), e.to_string())
            })?,
            None => defaults.page_size,
        };
        let cache_ttl = match get_optional_env("CATALOG_CACHE_TTL_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
            })?,
            None => defaults.cache_ttl,
        };

        Ok(Self {
            page_size,
            cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Whether a credential value is an unfilled template value.
fn is_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}
