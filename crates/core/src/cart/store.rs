//! The cart state container.

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::identity::derive_item_id;
use super::item::{CartItemInput, CartLineItem, CartState, MAX_QUANTITY};
use super::persist::{decode_items, encode_items};
use super::totals::{self, CartTotals};
use crate::storage::KeyValueStorage;
use crate::types::LineItemId;

/// Storage key the cart persists its items under.
pub const DEFAULT_CART_KEY: &str = "smiley-day-cart";

/// What changed in a cart notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    ItemsChanged,
    VisibilityChanged,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(CartEvent, &CartState) + Send + Sync>;

/// Single source of truth for one session's cart.
///
/// Every mutation that changes the items writes them to `storage`. Storage
/// failures are logged and otherwise ignored; the in-memory state stays
/// authoritative. Drawer visibility is never persisted.
pub struct CartStore<S> {
    state: CartState,
    storage: S,
    key: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Rehydrate a cart from `storage` under [`DEFAULT_CART_KEY`].
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, DEFAULT_CART_KEY)
    }

    /// Rehydrate a cart from `storage` under `key`.
    ///
    /// Missing or malformed data yields an empty cart.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = match storage.get(&key) {
            Ok(Some(raw)) => decode_items(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to read stored cart, starting empty");
                Vec::new()
            }
        };
        debug!(items = items.len(), "Cart hydrated");

        Self {
            state: CartState {
                items,
                is_open: false,
            },
            storage,
            key,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // =========================================================================
    // Item mutations
    // =========================================================================

    /// Add a candidate, merging into an existing line with the same identity.
    ///
    /// A repeat add accumulates quantity and keeps the first-seen title,
    /// price and image. Returns the line's id.
    pub fn add_item(&mut self, candidate: CartItemInput) -> LineItemId {
        let id = derive_item_id(
            &candidate.product_id,
            candidate.variant_id.as_ref(),
            candidate.selected_color.as_deref(),
        );
        let added = candidate.effective_quantity();

        if let Some(existing) = self.state.items.iter_mut().find(|item| item.id == id) {
            existing.quantity = existing.quantity.saturating_add(added).min(MAX_QUANTITY);
        } else {
            self.state.items.push(candidate.into_line_item(id.clone()));
        }

        self.items_changed();
        id
    }

    /// Remove the line with `id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &LineItemId) {
        let before = self.state.items.len();
        self.state.items.retain(|item| &item.id != id);

        if self.state.items.len() != before {
            self.items_changed();
        }
    }

    /// Set the quantity of the line with `id`.
    ///
    /// Quantities below 1 remove the line; quantities above the maximum are
    /// clamped. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: i64) {
        if quantity < 1 {
            self.remove_item(id);
            return;
        }

        let clamped = u32::try_from(quantity).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY));
        if let Some(item) = self.state.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = clamped;
            self.items_changed();
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        let had_items = !self.state.items.is_empty();
        self.state.items.clear();

        if had_items {
            self.items_changed();
        } else {
            self.persist();
        }
    }

    // =========================================================================
    // Drawer visibility
    // =========================================================================

    pub fn open_cart(&mut self) {
        self.set_open(true);
    }

    pub fn close_cart(&mut self) {
        self.set_open(false);
    }

    pub fn toggle_cart(&mut self) {
        self.set_open(!self.state.is_open);
    }

    /// Restore drawer visibility without touching storage.
    pub fn set_open(&mut self, open: bool) {
        if self.state.is_open != open {
            self.state.is_open = open;
            self.emit(CartEvent::VisibilityChanged);
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price * quantity` across all lines. No rounding is applied.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        totals::subtotal(&self.state.items)
    }

    /// Subtotal, shipping, tax and total for the current lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        totals::calculate_cart_totals(&self.state.items)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Number of distinct lines, ignoring quantities.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.state.items.len()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage backend back, dropping the in-memory state.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener called after every change to items or visibility.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(CartEvent, &CartState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn items_changed(&mut self) {
        self.persist();
        self.emit(CartEvent::ItemsChanged);
    }

    fn persist(&mut self) {
        let raw = match encode_items(&self.state.items) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, raw) {
            warn!(error = %e, key = %self.key, "Failed to persist cart, keeping it in memory");
        }
    }

    fn emit(&self, event: CartEvent) {
        for (_, listener) in &self.listeners {
            listener(event, &self.state);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use super::*;
    use crate::cart::ImageSnapshot;
    use crate::storage::{MemoryStorage, StorageError};
    use crate::types::{ProductId, VariantId};

    fn sunflower() -> CartItemInput {
        CartItemInput {
            product_id: ProductId::new("prod_1"),
            variant_id: Some(VariantId::new("variant_1")),
            title: "Sunflower Buddy".to_string(),
            handle: "sunflower-buddy".to_string(),
            price: Decimal::new(25, 0),
            currency: "USD".to_string(),
            quantity: None,
            image: ImageSnapshot {
                url: "/sunflower.png".to_string(),
                alt_text: "Sunflower Buddy".to_string(),
            },
            selected_color: Some("#FFB300".to_string()),
            selected_color_name: Some("Sunflower Yellow".to_string()),
        }
    }

    fn empty_store() -> CartStore<MemoryStorage> {
        CartStore::load(MemoryStorage::new())
    }

    /// Candidates over a small identity space so repeat adds merge.
    fn arb_candidate() -> impl Strategy<Value = CartItemInput> {
        (
            0_u8..4,
            prop::option::of(prop::sample::select(vec!["#FFB300", "#FFF3E0", "#795548"])),
            0_i64..=1_000_000,
            1_i64..=99,
        )
            .prop_map(|(product, color, cents, quantity)| CartItemInput {
                product_id: ProductId::new(format!("prod_{product}")),
                variant_id: None,
                price: Decimal::new(cents, 2),
                quantity: Some(quantity),
                selected_color: color.map(String::from),
                selected_color_name: None,
                ..sunflower()
            })
    }

    /// Storage whose writes always fail, like a browser with storage disabled.
    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = empty_store();
        cart.add_item(sunflower());

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[0].product_id.as_str(), "prod_1");
        assert_eq!(cart.item_count(), 1);
        assert!(!cart.is_open());
    }

    #[test]
    fn test_add_fresh_tuple_grows_cart_by_quantity() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        cart.add_item(CartItemInput {
            selected_color: Some("#FFF3E0".to_string()),
            quantity: Some(3),
            ..sunflower()
        });

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_add_same_item_twice_merges() {
        let mut cart = empty_store();
        let first = cart.add_item(sunflower());
        let second = cart.add_item(sunflower());

        assert_eq!(first, second);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.subtotal(), Decimal::new(50, 0));
    }

    #[test]
    fn test_repeat_add_keeps_first_snapshot() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        cart.add_item(CartItemInput {
            price: Decimal::new(99, 0),
            title: "Renamed".to_string(),
            quantity: Some(2),
            ..sunflower()
        });

        let item = &cart.items()[0];
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, Decimal::new(25, 0));
        assert_eq!(item.title, "Sunflower Buddy");
    }

    #[test]
    fn test_add_clamps_accumulated_quantity() {
        let mut cart = empty_store();
        cart.add_item(CartItemInput {
            quantity: Some(98),
            ..sunflower()
        });
        cart.add_item(CartItemInput {
            quantity: Some(5),
            ..sunflower()
        });
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = empty_store();
        let id = cart.add_item(sunflower());
        cart.remove_item(&id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        let before = cart.state().clone();

        cart.remove_item(&LineItemId::new("missing"));
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = empty_store();
        let id = cart.add_item(sunflower());
        cart.update_quantity(&id, 0);
        assert!(cart.is_empty());

        let id = cart.add_item(sunflower());
        cart.update_quantity(&id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps() {
        let mut cart = empty_store();
        let id = cart.add_item(sunflower());
        cart.update_quantity(&id, 150);
        assert_eq!(cart.items()[0].quantity, 99);

        cart.update_quantity(&id, i64::MAX);
        assert_eq!(cart.items()[0].quantity, 99);

        cart.update_quantity(&id, 7);
        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        cart.update_quantity(&LineItemId::new("missing"), 5);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_item_count_and_subtotal() {
        let mut cart = empty_store();
        cart.add_item(CartItemInput {
            quantity: Some(2),
            ..sunflower()
        });
        cart.add_item(CartItemInput {
            product_id: ProductId::new("prod_2"),
            variant_id: Some(VariantId::new("variant_2")),
            price: Decimal::new(10, 0),
            handle: "mini".to_string(),
            ..sunflower()
        });

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::new(60, 0));
    }

    #[test]
    fn test_unvalidated_huge_price_does_not_panic_totals() {
        let mut cart = empty_store();
        cart.add_item(CartItemInput {
            price: Decimal::MAX,
            quantity: Some(2),
            ..sunflower()
        });
        cart.add_item(CartItemInput {
            product_id: ProductId::new("prod_2"),
            price: Decimal::MAX,
            ..sunflower()
        });

        assert_eq!(cart.subtotal(), Decimal::MAX);
        let totals = cart.totals();
        assert_eq!(totals.total, Decimal::MAX);
        assert!(totals.has_free_shipping);
        assert_eq!(totals.amount_to_free_shipping, Decimal::ZERO);

        // Out-of-range lines are not rehydrated
        let reloaded = CartStore::load(cart.into_storage());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_toggle_visibility() {
        let mut cart = empty_store();
        cart.open_cart();
        assert!(cart.is_open());
        cart.close_cart();
        assert!(!cart.is_open());
        cart.toggle_cart();
        assert!(cart.is_open());
    }

    #[test]
    fn test_visibility_is_not_persisted() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        cart.open_cart();

        let reloaded = CartStore::load(cart.into_storage());
        assert!(!reloaded.is_open());
        assert_eq!(reloaded.item_count(), 1);
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        cart.add_item(CartItemInput {
            product_id: ProductId::new("prod_2"),
            variant_id: None,
            selected_color: None,
            selected_color_name: None,
            price: Decimal::new(1250, 2),
            quantity: Some(4),
            ..sunflower()
        });
        let original = cart.items().to_vec();

        let reloaded = CartStore::load(cart.into_storage());
        assert_eq!(reloaded.items(), original.as_slice());
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let mut cart = empty_store();
        cart.add_item(sunflower());
        cart.clear_cart();
        assert!(cart.is_empty());

        let reloaded = CartStore::load(cart.into_storage());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_malformed_storage_starts_empty() {
        for raw in ["{\"not\":\"an array\"}", "[[[", "\"string\"", "null"] {
            let storage = MemoryStorage::with_entry(DEFAULT_CART_KEY, raw);
            let cart = CartStore::load(storage);
            assert!(cart.is_empty(), "payload {raw:?}");
        }
    }

    #[test]
    fn test_custom_key() {
        let mut cart = CartStore::load_with_key(MemoryStorage::new(), "other-cart");
        cart.add_item(sunflower());

        let storage = cart.into_storage();
        assert!(storage.get("other-cart").unwrap().is_some());
        assert!(storage.get(DEFAULT_CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_broken_storage_keeps_memory_state() {
        let mut cart = CartStore::load(BrokenStorage);
        cart.add_item(sunflower());
        cart.add_item(sunflower());
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_borrowed_storage() {
        let mut storage = MemoryStorage::new();
        {
            let mut cart = CartStore::load(&mut storage);
            cart.add_item(sunflower());
        }
        assert!(storage.get(DEFAULT_CART_KEY).unwrap().is_some());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let mut cart = empty_store();
        let item_events = Arc::new(AtomicUsize::new(0));
        let visibility_events = Arc::new(AtomicUsize::new(0));

        let items = Arc::clone(&item_events);
        let visibility = Arc::clone(&visibility_events);
        let subscription = cart.subscribe(move |event, _state| match event {
            CartEvent::ItemsChanged => {
                items.fetch_add(1, Ordering::SeqCst);
            }
            CartEvent::VisibilityChanged => {
                visibility.fetch_add(1, Ordering::SeqCst);
            }
        });

        let id = cart.add_item(sunflower());
        cart.remove_item(&LineItemId::new("missing"));
        cart.update_quantity(&id, 3);
        cart.open_cart();
        cart.open_cart();
        cart.toggle_cart();

        assert_eq!(item_events.load(Ordering::SeqCst), 2);
        assert_eq!(visibility_events.load(Ordering::SeqCst), 2);

        cart.unsubscribe(subscription);
        cart.clear_cart();
        assert_eq!(item_events.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscriber_receives_current_state() {
        let mut cart = empty_store();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_count = Arc::clone(&seen);
        cart.subscribe(move |_, state| {
            let total: u32 = state.items.iter().map(|item| item.quantity).sum();
            seen_count.store(total as usize, Ordering::SeqCst);
        });

        cart.add_item(CartItemInput {
            quantity: Some(4),
            ..sunflower()
        });
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    proptest! {
        #[test]
        fn prop_persistence_round_trip(
            candidates in prop::collection::vec(arb_candidate(), 0..12)
        ) {
            let mut cart = empty_store();
            for candidate in candidates {
                cart.add_item(candidate);
            }
            let original = cart.items().to_vec();
            prop_assert!(original.iter().all(|item| (1..=MAX_QUANTITY).contains(&item.quantity)));

            let reloaded = CartStore::load(cart.into_storage());
            prop_assert_eq!(reloaded.items(), original.as_slice());
            prop_assert_eq!(reloaded.subtotal(), totals::subtotal(&original));
        }
    }
}
