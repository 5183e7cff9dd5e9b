//! Price formatting and currency labels.
//!
//! Cart prices are snapshots taken at add-time, so they are stored as plain
//! `Decimal` amounts next to a free-form currency code. [`CurrencyCode`]
//! covers the currencies the storefront knows how to label; anything else
//! is still carried through as a string and rendered with `$`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default currency for line items and products without an explicit code.
pub const DEFAULT_CURRENCY: &str = "USD";

/// ISO 4217 currency codes with a known display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Error returned when a currency code is not one of the labelled currencies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(UnknownCurrency(other.to_owned())),
        }
    }
}

/// Symbol for an arbitrary currency code; unknown codes fall back to `$`.
#[must_use]
pub fn currency_symbol(currency_code: &str) -> &'static str {
    match currency_code.parse::<CurrencyCode>() {
        Ok(currency) => currency.symbol(),
        Err(e) => {
            tracing::debug!(error = %e, "No symbol for currency, using $");
            "$"
        }
    }
}

/// Round to two decimal places, midpoint away from zero.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with its currency symbol, fixed to two decimals.
///
/// ```rust
/// # use rust_decimal::Decimal;
/// # use smiley_day_core::format_price;
/// assert_eq!(format_price(Decimal::new(2550, 2), "GBP"), "£25.50");
/// assert_eq!(format_price(Decimal::new(3, 0), "JPY"), "$3.00");
/// ```
#[must_use]
pub fn format_price(amount: Decimal, currency_code: &str) -> String {
    format!(
        "{}{:.2}",
        currency_symbol(currency_code),
        round_to_cents(amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_known_currencies() {
        let amount = Decimal::new(1999, 2);
        assert_eq!(format_price(amount, "USD"), "$19.99");
        assert_eq!(format_price(amount, "EUR"), "€19.99");
        assert_eq!(format_price(amount, "GBP"), "£19.99");
        assert_eq!(format_price(amount, "CAD"), "$19.99");
        assert_eq!(format_price(amount, "AUD"), "$19.99");
    }

    #[test]
    fn test_format_price_unknown_currency_defaults_to_dollar() {
        assert_eq!(format_price(Decimal::new(5, 0), "XYZ"), "$5.00");
        assert_eq!(format_price(Decimal::new(5, 0), ""), "$5.00");
    }

    #[test]
    fn test_format_price_pads_and_rounds() {
        assert_eq!(format_price(Decimal::new(50, 0), "USD"), "$50.00");
        assert_eq!(format_price(Decimal::new(12_345, 3), "USD"), "$12.35");
        assert_eq!(format_price(Decimal::new(5099, 2), "USD"), "$50.99");
    }

    #[test]
    fn test_currency_parsing_is_case_sensitive() {
        assert_eq!("GBP".parse::<CurrencyCode>(), Ok(CurrencyCode::GBP));
        assert_eq!(
            "usd".parse::<CurrencyCode>(),
            Err(UnknownCurrency("usd".to_string()))
        );
        assert_eq!(
            UnknownCurrency("JPY".to_string()).to_string(),
            "unsupported currency code: JPY"
        );
    }
}
