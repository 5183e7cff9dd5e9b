//! Shopify Storefront API client implementation.
//!
//! Hand-written [`GraphQLQuery`] impls with `reqwest` 0.13 for HTTP. Caching
//! lives one layer up in [`crate::catalog::CatalogCache`].

pub mod conversions;
pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use smiley_day_core::catalog::Product;
use tracing::instrument;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{GraphQLError, ShopifyError};

use conversions::convert_product;
use queries::{AllProducts, ProductByHandle, all_products, product_by_handle};

/// Header carrying the public Storefront API token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Longest slice of an error body kept for logs.
const LOG_BODY_LIMIT: usize = 500;

/// Longest slice of an error body kept on [`ShopifyError::Status`].
const STATUS_BODY_LIMIT: usize = 200;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    page_size: u32,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .field("page_size", &self.inner.page_size)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a client for the configured store.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig, page_size: u32) -> Self {
        Self::with_endpoint(config.endpoint(), config.access_token.clone(), page_size)
    }

    /// Create a client for an explicit GraphQL endpoint URL.
    #[must_use]
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: SecretString,
        page_size: u32,
    ) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token,
                page_size,
            }),
        }
    }

    /// Run one query: POST the body, map the HTTP status, decode the
    /// envelope. GraphQL-level errors win over partial data.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let body = Q::build_query(variables);
        let operation = body.operation_name;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(response.headers());
            tracing::warn!(operation, retry_after, "Storefront API rate limit hit");
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let text = response.text().await?;
        if !status.is_success() {
            tracing::error!(
                operation,
                %status,
                body = %truncate(&text),
                "Storefront API request failed"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: text.chars().take(STATUS_BODY_LIMIT).collect(),
            });
        }

        decode::<Q::ResponseData>(operation, &text)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the first page of products, normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(first = self.inner.page_size))]
    pub async fn all_products(&self) -> Result<Vec<Product>, ShopifyError> {
        let variables = all_products::Variables {
            first: i64::from(self.inner.page_size),
        };

        let data = self.execute::<AllProducts>(variables).await?;
        let products: Vec<Product> = data.products.into_nodes().map(convert_product).collect();

        if products.is_empty() {
            tracing::warn!("Shopify returned no products; check the store has published products");
        }

        Ok(products)
    }

    /// Fetch one product by its URL handle. `Ok(None)` when no product has
    /// that handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_by_handle(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        let variables = product_by_handle::Variables {
            handle: handle.to_string(),
        };

        let data = self.execute::<ProductByHandle>(variables).await?;
        Ok(data.product.map(convert_product))
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

/// `Retry-After` in whole seconds; 1 when absent or not a number.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(1)
}

/// Decode a GraphQL envelope into its data.
fn decode<T: DeserializeOwned>(operation: &str, text: &str) -> Result<T, ShopifyError> {
    let envelope: Response<T> = serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            operation,
            error = %e,
            body = %truncate(text),
            "Undecodable Storefront API response"
        );
        ShopifyError::Parse(e)
    })?;

    let errors: Vec<GraphQLError> = envelope
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(GraphQLError::from)
        .collect();
    if !errors.is_empty() {
        tracing::debug!(
            operation,
            count = errors.len(),
            "Storefront API returned GraphQL errors"
        );
        return Err(ShopifyError::GraphQL(errors));
    }

    envelope.data.ok_or_else(|| {
        tracing::error!(operation, "Storefront API response carried neither data nor errors");
        ShopifyError::GraphQL(vec![GraphQLError {
            message: "response has no data".to_string(),
            locations: vec![],
            path: vec![],
        }])
    })
}
