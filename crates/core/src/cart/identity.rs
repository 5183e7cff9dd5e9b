//! Line item identity.
//!
//! Segments are joined with `|`, which is not a legal unescaped character in
//! Shopify GIDs (they are URIs) and never occurs in hex color values. The
//! optional segments carry a tag so that a missing variant can never be
//! confused with a variant whose id happens to look like a color.

use crate::types::{LineItemId, ProductId, VariantId};

const SEPARATOR: char = '|';
const VARIANT_TAG: &str = "v:";
const COLOR_TAG: &str = "c:";

/// Derive the stable cart identity for a (product, variant, color) tuple.
///
/// ```rust
/// # use smiley_day_core::cart::derive_item_id;
/// # use smiley_day_core::{ProductId, VariantId};
/// let id = derive_item_id(&ProductId::new("p1"), Some(&VariantId::new("v1")), Some("#FFB300"));
/// assert_eq!(id.as_str(), "p1|v:v1|c:#FFB300");
/// ```
#[must_use]
pub fn derive_item_id(
    product_id: &ProductId,
    variant_id: Option<&VariantId>,
    selected_color: Option<&str>,
) -> LineItemId {
    let mut id = String::from(product_id.as_str());

    if let Some(variant) = variant_id.filter(|v| !v.is_empty()) {
        id.push(SEPARATOR);
        id.push_str(VARIANT_TAG);
        id.push_str(variant.as_str());
    }

    if let Some(color) = selected_color.filter(|c| !c.is_empty()) {
        id.push(SEPARATOR);
        id.push_str(COLOR_TAG);
        id.push_str(color);
    }

    LineItemId::from(id)
}
