//! Derived cart totals and display helpers.

use rust_decimal::Decimal;
use serde::Serialize;

use super::item::CartLineItem;

/// Tax rate applied to the subtotal. The shop is currently tax-exempt.
pub const TAX_RATE: Decimal = Decimal::ZERO;

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Totals for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub shipping_threshold: Decimal,
    pub has_free_shipping: bool,
    pub amount_to_free_shipping: Decimal,
}

/// Sum of `price * quantity` over `items`, exact below `Decimal::MAX` and
/// saturating above it.
#[must_use]
pub fn subtotal(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .map(CartLineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Compute subtotal, tax, shipping and the free-shipping progress.
#[must_use]
pub fn calculate_cart_totals(items: &[CartLineItem]) -> CartTotals {
    let subtotal = subtotal(items);
    let tax = subtotal.saturating_mul(TAX_RATE);
    let has_free_shipping = subtotal >= FREE_SHIPPING_THRESHOLD;
    let shipping = if has_free_shipping {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };

    CartTotals {
        subtotal,
        tax,
        shipping,
        total: subtotal.saturating_add(tax).saturating_add(shipping),
        shipping_threshold: FREE_SHIPPING_THRESHOLD,
        has_free_shipping,
        amount_to_free_shipping: FREE_SHIPPING_THRESHOLD
            .saturating_sub(subtotal)
            .max(Decimal::ZERO),
    }
}

/// Item title, suffixed with the chosen color name when there is one.
#[must_use]
pub fn cart_item_display_name(item: &CartLineItem) -> String {
    match item.selected_color_name.as_deref() {
        Some(color) if !color.is_empty() => format!("{} - {color}", item.title),
        _ => item.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::cart::{ImageSnapshot, MAX_QUANTITY};
    use crate::types::{LineItemId, ProductId};

    fn line(price: Decimal, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: LineItemId::new(format!("p-{price}-{quantity}")),
            product_id: ProductId::new("p"),
            variant_id: None,
            title: "Sunflower Buddy".to_string(),
            handle: "sunflower-buddy".to_string(),
            price,
            currency: "USD".to_string(),
            quantity,
            image: ImageSnapshot::default(),
            selected_color: None,
            selected_color_name: None,
        }
    }

    #[test]
    fn test_below_threshold_charges_shipping() {
        let totals = calculate_cart_totals(&[line(Decimal::new(15, 0), 3)]);
        assert_eq!(totals.subtotal, Decimal::new(45, 0));
        assert!(!totals.has_free_shipping);
        assert_eq!(totals.amount_to_free_shipping, Decimal::new(500, 2));
        assert_eq!(totals.shipping, Decimal::new(599, 2));
        assert_eq!(totals.total, Decimal::new(5099, 2));
        assert_eq!(totals.tax, Decimal::ZERO);
    }

    #[test]
    fn test_exact_threshold_ships_free() {
        let totals = calculate_cart_totals(&[line(Decimal::new(25, 0), 2)]);
        assert_eq!(totals.subtotal, Decimal::new(50, 0));
        assert!(totals.has_free_shipping);
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.amount_to_free_shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(50, 0));
    }

    #[test]
    fn test_empty_cart() {
        let totals = calculate_cart_totals(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping_threshold, Decimal::new(50, 0));
        assert_eq!(totals.amount_to_free_shipping, Decimal::new(50, 0));
    }

    #[test]
    fn test_subtotal_is_exact_for_fractional_prices() {
        let items = [
            line(Decimal::new(10, 2), 3),
            line(Decimal::new(20, 2), 1),
            line(Decimal::new(1999, 2), 7),
        ];
        assert_eq!(subtotal(&items), Decimal::new(14043, 2));
    }

    #[test]
    fn test_display_name() {
        let mut item = line(Decimal::ONE, 1);
        assert_eq!(cart_item_display_name(&item), "Sunflower Buddy");
        item.selected_color_name = Some("Sunflower Yellow".to_string());
        assert_eq!(
            cart_item_display_name(&item),
            "Sunflower Buddy - Sunflower Yellow"
        );
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let items = [line(Decimal::MAX, 2), line(Decimal::MAX, 1)];
        let totals = calculate_cart_totals(&items);
        assert_eq!(totals.subtotal, Decimal::MAX);
        assert_eq!(totals.total, Decimal::MAX);
        assert_eq!(totals.amount_to_free_shipping, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_sum_of_line_totals(
            lines in prop::collection::vec((0_i64..=100_000_000, 1_u32..=MAX_QUANTITY), 0..20)
        ) {
            let items: Vec<CartLineItem> = lines
                .iter()
                .map(|&(cents, quantity)| line(Decimal::new(cents, 2), quantity))
                .collect();
            let expected_cents: i128 = lines
                .iter()
                .map(|&(cents, quantity)| i128::from(cents) * i128::from(quantity))
                .sum();

            prop_assert_eq!(subtotal(&items), Decimal::from_i128_with_scale(expected_cents, 2));

            let totals = calculate_cart_totals(&items);
            prop_assert_eq!(totals.total, totals.subtotal + totals.shipping);
            prop_assert_eq!(totals.has_free_shipping, totals.subtotal >= FREE_SHIPPING_THRESHOLD);
        }
    }
}
