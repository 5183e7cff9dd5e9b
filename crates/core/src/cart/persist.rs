//! Persisted cart payload.
//!
//! Items are written in the same envelope the browser store uses,
//! `{"state":{"items":[...]},"version":0}`, so a payload saved by either side
//! can be read by the other. A bare JSON array is accepted on read as well.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::identity::derive_item_id;
use super::item::{CartLineItem, MAX_QUANTITY, MAX_UNIT_PRICE};

/// Version written into the persist envelope.
pub const PERSIST_VERSION: u32 = 0;

#[derive(Serialize)]
struct Envelope<'a> {
    state: PersistedState<'a>,
    version: u32,
}

#[derive(Serialize)]
struct PersistedState<'a> {
    items: &'a [CartLineItem],
}

/// Serialize items into the persist envelope.
///
/// # Errors
///
/// Returns an error if an item cannot be serialized.
pub fn encode_items(items: &[CartLineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        state: PersistedState { items },
        version: PERSIST_VERSION,
    })
}

/// Parse a persisted payload. Never fails: anything unrecognizable yields an
/// empty list, and individual malformed entries are skipped.
#[must_use]
pub fn decode_items(raw: &str) -> Vec<CartLineItem> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse stored cart, starting empty");
            return Vec::new();
        }
    };

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map
            .get_mut("state")
            .and_then(|state| state.get_mut("items"))
            .map(Value::take)
        {
            Some(Value::Array(entries)) => entries,
            _ => {
                tracing::warn!("Stored cart has no item list, starting empty");
                return Vec::new();
            }
        },
        _ => {
            tracing::warn!("Stored cart is not a sequence, starting empty");
            return Vec::new();
        }
    };

    let items = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<CartLineItem>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed stored cart item");
                None
            }
        })
        .collect();

    sanitize(items)
}

/// Restore the cart invariants on rehydrated items: canonical ids, unique
/// ids (first wins), quantities within `1..=MAX_QUANTITY`, prices within
/// `0..=MAX_UNIT_PRICE`.
fn sanitize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut seen = HashSet::new();

    items
        .into_iter()
        .filter(|item| item.quantity >= 1)
        .filter(|item| {
            let in_range = (Decimal::ZERO..=MAX_UNIT_PRICE).contains(&item.price);
            if !in_range {
                tracing::warn!(
                    price = %item.price,
                    "Dropping stored cart item with out-of-range price"
                );
            }
            in_range
        })
        .filter_map(|mut item| {
            item.id = derive_item_id(
                &item.product_id,
                item.variant_id.as_ref(),
                item.selected_color.as_deref(),
            );
            item.quantity = item.quantity.min(MAX_QUANTITY);
            seen.insert(item.id.clone()).then_some(item)
        })
        .collect()
}
