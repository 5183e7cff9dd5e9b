//! Conversions from Storefront API wire types to catalog products.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use smiley_day_core::ProductId;
use smiley_day_core::cart::ImageSnapshot;
use smiley_day_core::catalog::color::color_to_hex;
use smiley_day_core::catalog::{DEFAULT_COLLECTION, Product};

use crate::shopify::types::ProductNode;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"<[^>]*>").unwrap()
});

/// Remove HTML tags and surrounding whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}

/// Whether an option name is the color option.
fn is_color_option(name: &str) -> bool {
    name.eq_ignore_ascii_case("color") || name.eq_ignore_ascii_case("colour")
}

/// Convert a product node into a catalog product.
#[must_use]
pub fn convert_product(node: ProductNode) -> Product {
    let title = node.title;

    let price = Decimal::from_str(&node.price_range.min_variant_price.amount).unwrap_or_else(|e| {
        tracing::warn!(
            product_id = %node.id,
            amount = %node.price_range.min_variant_price.amount,
            error = %e,
            "Unparseable product price, using zero"
        );
        Decimal::ZERO
    });

    let images = node
        .images
        .into_nodes()
        .map(|image| ImageSnapshot {
            url: image.url,
            alt_text: image
                .alt_text
                .filter(|alt| !alt.trim().is_empty())
                .unwrap_or_else(|| title.clone()),
        })
        .collect();

    let description = node
        .description_html
        .as_deref()
        .map(strip_html)
        .unwrap_or_default();

    let collection = node
        .collections
        .into_nodes()
        .next()
        .map(|c| c.title)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

    let color_names: Vec<String> = node
        .options
        .into_iter()
        .find(|option| is_color_option(&option.name))
        .map(|option| option.values)
        .unwrap_or_default();
    let colors: Vec<String> = color_names.iter().map(|name| color_to_hex(name)).collect();

    let created_at = node
        .created_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Product {
        id: ProductId::new(node.id),
        title,
        handle: node.handle,
        description,
        price,
        currency: node.price_range.min_variant_price.currency_code,
        images,
        initial_color: colors.first().cloned(),
        colors,
        color_names,
        collection,
        created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn node(value: serde_json::Value) -> ProductNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hand-knit <strong>sunflower</strong> buddy.</p>\n"),
            "Hand-knit sunflower buddy."
        );
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_convert_full_product() {
        let product = convert_product(node(json!({
            "id": "gid://shopify/Product/1",
            "title": "Sunflower Buddy",
            "handle": "sunflower-buddy",
            "descriptionHtml": "<p>Soft and <em>happy</em></p>",
            "createdAt": "2025-03-01T12:00:00Z",
            "priceRange": { "minVariantPrice": { "amount": "25.0", "currencyCode": "USD" } },
            "images": { "edges": [
                { "node": { "url": "https://cdn.shopify.com/1.png", "altText": null } },
                { "node": { "url": "https://cdn.shopify.com/2.png", "altText": "Back view" } }
            ] },
            "options": [
                { "name": "Size", "values": ["Small"] },
                { "name": "Colour", "values": ["Sunflower", "Cream", "Plaid"] }
            ],
            "collections": { "edges": [ { "node": { "title": "Plushies" } } ] }
        })));

        assert_eq!(product.id.as_str(), "gid://shopify/Product/1");
        assert_eq!(product.price, Decimal::new(25, 0));
        assert_eq!(product.description, "Soft and happy");
        assert_eq!(product.collection, "Plushies");
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.images[0].alt_text, "Sunflower Buddy");
        assert_eq!(product.images[1].alt_text, "Back view");
        assert_eq!(product.color_names, ["Sunflower", "Cream", "Plaid"]);
        assert_eq!(product.colors, ["#FFB300", "#FFF3E0", "#FFB300"]);
        assert_eq!(product.initial_color.as_deref(), Some("#FFB300"));
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_convert_minimal_product() {
        let product = convert_product(node(json!({
            "id": "gid://shopify/Product/2",
            "title": "Mini Bee",
            "handle": "mini-bee",
            "priceRange": { "minVariantPrice": { "amount": "not-a-number", "currencyCode": "EUR" } }
        })));

        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.currency, "EUR");
        assert_eq!(product.collection, DEFAULT_COLLECTION);
        assert!(product.images.is_empty());
        assert!(product.colors.is_empty());
        assert_eq!(product.initial_color, None);
        assert_eq!(product.description, "");
        assert_eq!(product.created_at, None);
    }
}
