//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - `graphql_client` envelopes (`QueryBody`, `Response`) over `reqwest`
//! - Shopify is source of truth; products are normalized into
//!   [`smiley_day_core::catalog::Product`] and cached by
//!   [`crate::catalog::CatalogCache`]
//!
//! # Example
//!
//! ```rust,ignore
//! use smiley_day_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&shopify_config, 10)?;
//! let products = client.all_products().await?;
//! let product = client.product_by_handle("sunflower-buddy").await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use storefront::conversions;

use thiserror::Error;

/// Errors that can occur when talking to the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("request to Shopify failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status. `body` is truncated.
    #[error("Shopify returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Shopify rejected the query: {}", join_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    #[error("unreadable Shopify response: {0}")]
    Parse(#[from] serde_json::Error),

    /// 429 with the `Retry-After` seconds (1 when absent).
    #[error("rate limited by Shopify, retry in {0}s")]
    RateLimited(u64),
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    pub message: String,
    pub locations: Vec<GraphQLErrorLocation>,
    /// Response path, indices rendered as strings.
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    pub line: i64,
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        let locations = e
            .locations
            .unwrap_or_default()
            .into_iter()
            .map(|l| GraphQLErrorLocation {
                line: i64::from(l.line),
                column: i64::from(l.column),
            })
            .collect();

        let path = e
            .path
            .unwrap_or_default()
            .into_iter()
            .map(|fragment| match fragment {
                graphql_client::PathFragment::Key(key) => key,
                graphql_client::PathFragment::Index(index) => index.to_string(),
            })
            .collect();

        Self {
            message: e.message,
            locations,
            path,
        }
    }
}

impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = if self.message.is_empty() {
            "unknown error"
        } else {
            self.message.as_str()
        };
        f.write_str(message)?;

        if !self.path.is_empty() {
            write!(f, " (at {})", self.path.join("."))?;
        }
        if let Some(location) = self.locations.first() {
            write!(f, " [{}:{}]", location.line, location.column)?;
        }
        Ok(())
    }
}

fn join_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "no details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
