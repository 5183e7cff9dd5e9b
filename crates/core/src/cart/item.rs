//! Cart line items and cart state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_CURRENCY, LineItemId, ProductId, VariantId};

/// Upper bound for the quantity of a single line item.
pub const MAX_QUANTITY: u32 = 99;

/// Highest unit price a line item may carry.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Image snapshot captured when an item is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSnapshot {
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
}

/// One distinct (product, variant, chosen option) entry in the cart.
///
/// Title, price and image are a snapshot of the product at add-time; they
/// are never re-synced with the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Identity derived from product, variant and selected color.
    pub id: LineItemId,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub title: String,
    #[serde(default)]
    pub handle: String,
    /// Unit price in the currency's standard unit.
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Always within `1..=MAX_QUANTITY` while the item is in a cart.
    pub quantity: u32,
    #[serde(default)]
    pub image: ImageSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color_name: Option<String>,
}

impl CartLineItem {
    /// `price * quantity` for this line, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// A line item as submitted by a caller, before identity is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    /// Empty when absent; rejected by validation.
    #[serde(default)]
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Defaults to 1 when absent. Signed so out-of-range values reach
    /// validation instead of failing to deserialize.
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub image: ImageSnapshot,
    #[serde(default)]
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_color_name: Option<String>,
}

impl CartItemInput {
    /// Quantity to add: absent or below one counts as one, anything above
    /// [`MAX_QUANTITY`] counts as the maximum.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.map_or(1, |q| {
            u32::try_from(q.clamp(1, i64::from(MAX_QUANTITY))).unwrap_or(1)
        })
    }

    /// Materialize the candidate as a line item under `id`.
    pub(crate) fn into_line_item(self, id: LineItemId) -> CartLineItem {
        let quantity = self.effective_quantity();
        CartLineItem {
            id,
            product_id: self.product_id,
            variant_id: self.variant_id,
            title: self.title,
            handle: self.handle,
            price: self.price,
            currency: self.currency,
            quantity,
            image: self.image,
            selected_color: self.selected_color,
            selected_color_name: self.selected_color_name,
        }
    }
}

/// Cart contents plus drawer visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Insertion order is display order.
    pub items: Vec<CartLineItem>,
    /// Drawer visibility; never persisted.
    pub is_open: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_owned()
}
