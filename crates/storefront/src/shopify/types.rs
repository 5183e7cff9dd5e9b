//! Wire types for the Storefront API product queries.
//!
//! These mirror the selection sets in [`super::storefront::queries`] and are
//! only used to deserialize responses; the rest of the storefront works on
//! [`smiley_day_core::catalog::Product`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Connection Types
// =============================================================================

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    /// Unwrap the edges into their nodes.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

/// One edge of a [`Connection`].
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Price range for a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
}

// =============================================================================
// Product Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub alt_text: Option<String>,
}

/// A product option such as "Color" with its values.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Collection reference; only the title is selected.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRef {
    pub title: String,
}

/// A product node as returned by both product queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    /// Rich description (HTML).
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub price_range: PriceRange,
    #[serde(default)]
    pub images: Connection<Image>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub collections: Connection<CollectionRef>,
}

// =============================================================================
// Query Response Data
// =============================================================================

/// Response data for `AllProducts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AllProductsData {
    pub products: Connection<ProductNode>,
}

/// Response data for `ProductByHandle`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductByHandleData {
    pub product: Option<ProductNode>,
}
