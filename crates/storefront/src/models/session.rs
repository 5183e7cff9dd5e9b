//! Session-related types.
//!
//! Keys under which per-browser client state is stored in the session.

/// Session keys for storefront client state.
pub mod keys {
    /// Key for the persisted cart payload (`{"state":{"items":[...]},"version":0}`).
    pub const CART: &str = smiley_day_core::cart::DEFAULT_CART_KEY;

    /// Key for whether the cart drawer is open. Kept apart from the cart
    /// payload so drawer visibility is never persisted with the items.
    pub const CART_OPEN: &str = "cart_open";

    /// Key for the pending toast notifications.
    pub const TOASTS: &str = "toasts";
}
