//! Normalized catalog products.
//!
//! The storefront fetches products from Shopify and converts them into
//! [`Product`]; everything downstream (listing filters, add-to-cart) works on
//! this shape only.

pub mod color;
pub mod filter;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{CartItemInput, ImageSnapshot};
use crate::types::{DEFAULT_CURRENCY, ProductId, VariantId};

/// Image shown when a product has none.
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder-product.png";

/// Collection name for products not assigned to any collection.
pub const DEFAULT_COLLECTION: &str = "All Products";

/// A catalog product as shown on listing and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub handle: String,
    /// Plain-text description (HTML stripped).
    #[serde(default)]
    pub description: String,
    /// Lowest variant price.
    pub price: Decimal,
    pub currency: String,
    pub images: Vec<ImageSnapshot>,
    /// Hex values for the color option, parallel to `color_names`.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_names: Vec<String>,
    #[serde(default)]
    pub initial_color: Option<String>,
    pub collection: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Human label for a hex color of this product, if it has one.
    #[must_use]
    pub fn color_name_for(&self, hex: &str) -> Option<&str> {
        self.colors
            .iter()
            .position(|c| c.eq_ignore_ascii_case(hex))
            .and_then(|i| self.color_names.get(i))
            .map(String::as_str)
    }
}

/// Choices made on a product page before adding to cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartOptions {
    pub selected_color: Option<String>,
    pub selected_color_name: Option<String>,
    pub variant_id: Option<VariantId>,
    pub quantity: Option<i64>,
}

/// Snapshot a product and the chosen options as a cart candidate.
#[must_use]
pub fn product_to_cart_item(product: &Product, options: CartOptions) -> CartItemInput {
    let image = product
        .images
        .first()
        .cloned()
        .unwrap_or_else(|| ImageSnapshot {
            url: PLACEHOLDER_IMAGE_URL.to_owned(),
            alt_text: product.title.clone(),
        });

    let currency = if product.currency.is_empty() {
        DEFAULT_CURRENCY.to_owned()
    } else {
        product.currency.clone()
    };

    CartItemInput {
        product_id: product.id.clone(),
        variant_id: options.variant_id,
        title: product.title.clone(),
        handle: product.handle.clone(),
        price: product.price,
        currency,
        quantity: Some(options.quantity.filter(|q| *q > 0).unwrap_or(1)),
        image,
        selected_color: options.selected_color,
        selected_color_name: options.selected_color_name,
    }
}
