//! Core types for the Smiley Day storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{
    CurrencyCode, DEFAULT_CURRENCY, UnknownCurrency, currency_symbol, format_price, round_to_cents,
};
