//! Advisory validation for cart candidates.
//!
//! Callers run this before [`CartStore::add_item`](super::CartStore::add_item);
//! the store itself only clamps quantities.

use rust_decimal::Decimal;
use thiserror::Error;

use super::item::{CartItemInput, MAX_QUANTITY, MAX_UNIT_PRICE};

/// Reason a candidate item was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartItemError {
    #[error("Product ID is required")]
    MissingProductId,
    #[error("Product title is required")]
    MissingTitle,
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Price cannot exceed 1000000")]
    PriceTooHigh,
    #[error("Quantity must be at least 1")]
    QuantityTooLow,
    #[error("Quantity cannot exceed 99")]
    QuantityTooHigh,
}

impl CartItemError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingProductId => "missing_product_id",
            Self::MissingTitle => "missing_title",
            Self::NegativePrice => "negative_price",
            Self::PriceTooHigh => "price_too_high",
            Self::QuantityTooLow => "quantity_too_low",
            Self::QuantityTooHigh => "quantity_too_high",
        }
    }
}

/// Check a candidate before it is added. An absent quantity counts as 1.
///
/// # Errors
///
/// Returns the first failed check, in the order: product id, title, negative
/// price, price above [`MAX_UNIT_PRICE`], minimum quantity, maximum quantity.
pub fn validate_cart_item(item: &CartItemInput) -> Result<(), CartItemError> {
    if item.product_id.as_str().trim().is_empty() {
        return Err(CartItemError::MissingProductId);
    }

    if item.title.trim().is_empty() {
        return Err(CartItemError::MissingTitle);
    }

    if item.price < Decimal::ZERO {
        return Err(CartItemError::NegativePrice);
    }

    if item.price > MAX_UNIT_PRICE {
        return Err(CartItemError::PriceTooHigh);
    }

    let quantity = item.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(CartItemError::QuantityTooLow);
    }

    if quantity > i64::from(MAX_QUANTITY) {
        return Err(CartItemError::QuantityTooHigh);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ImageSnapshot;
    use crate::types::ProductId;

    fn valid() -> CartItemInput {
        CartItemInput {
            product_id: ProductId::new("p1"),
            variant_id: None,
            title: "Sunflower Buddy".to_string(),
            handle: "sunflower-buddy".to_string(),
            price: Decimal::new(25, 0),
            currency: "USD".to_string(),
            quantity: Some(1),
            image: ImageSnapshot::default(),
            selected_color: None,
            selected_color_name: None,
        }
    }

    #[test]
    fn test_valid_item() {
        assert_eq!(validate_cart_item(&valid()), Ok(()));
        let free = CartItemInput {
            price: Decimal::ZERO,
            quantity: None,
            ..valid()
        };
        assert_eq!(validate_cart_item(&free), Ok(()));
        let ceiling = CartItemInput {
            price: MAX_UNIT_PRICE,
            quantity: Some(99),
            ..valid()
        };
        assert_eq!(validate_cart_item(&ceiling), Ok(()));
    }

    #[test]
    fn test_rejections() {
        let cases = [
            (
                CartItemInput {
                    product_id: ProductId::new(""),
                    ..valid()
                },
                CartItemError::MissingProductId,
            ),
            (
                CartItemInput {
                    title: "   ".to_string(),
                    ..valid()
                },
                CartItemError::MissingTitle,
            ),
            (
                CartItemInput {
                    price: Decimal::new(-1, 2),
                    ..valid()
                },
                CartItemError::NegativePrice,
            ),
            (
                CartItemInput {
                    price: Decimal::MAX,
                    quantity: Some(2),
                    ..valid()
                },
                CartItemError::PriceTooHigh,
            ),
            (
                CartItemInput {
                    quantity: Some(0),
                    ..valid()
                },
                CartItemError::QuantityTooLow,
            ),
            (
                CartItemInput {
                    quantity: Some(-1),
                    ..valid()
                },
                CartItemError::QuantityTooLow,
            ),
            (
                CartItemInput {
                    quantity: Some(100),
                    ..valid()
                },
                CartItemError::QuantityTooHigh,
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(validate_cart_item(&input), Err(expected));
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CartItemError::NegativePrice.to_string(),
            "Price cannot be negative"
        );
        assert_eq!(CartItemError::QuantityTooHigh.code(), "quantity_too_high");
    }
}
