//! Shopping cart state.
//!
//! [`CartStore`] owns the line items of one browsing session and the drawer
//! visibility flag. Lines are keyed by an identity derived from product,
//! variant and selected color, so adding the same combination twice merges
//! into one line. Items persist through any [`KeyValueStorage`] backend.
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use smiley_day_core::cart::{CartItemInput, CartStore, ImageSnapshot};
//! use smiley_day_core::{MemoryStorage, ProductId};
//!
//! let mut cart = CartStore::load(MemoryStorage::new());
//! let item = CartItemInput {
//!     product_id: ProductId::new("p1"),
//!     variant_id: None,
//!     title: "Sunflower Buddy".to_string(),
//!     handle: "sunflower-buddy".to_string(),
//!     price: Decimal::new(25, 0),
//!     currency: "USD".to_string(),
//!     quantity: Some(1),
//!     image: ImageSnapshot::default(),
//!     selected_color: None,
//!     selected_color_name: None,
//! };
//!
//! cart.add_item(item.clone());
//! cart.add_item(item);
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.subtotal(), Decimal::new(50, 0));
//! ```
//!
//! [`KeyValueStorage`]: crate::storage::KeyValueStorage

mod identity;
mod item;
mod persist;
mod store;
mod totals;
mod validate;

pub use identity::derive_item_id;
pub use item::{CartItemInput, CartLineItem, CartState, ImageSnapshot, MAX_QUANTITY, MAX_UNIT_PRICE};
pub use persist::{PERSIST_VERSION, decode_items, encode_items};
pub use store::{CartEvent, CartStore, DEFAULT_CART_KEY, SubscriptionId};
pub use totals::{
    CartTotals, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, TAX_RATE, calculate_cart_totals,
    cart_item_display_name, subtotal,
};
pub use validate::{CartItemError, validate_cart_item};
