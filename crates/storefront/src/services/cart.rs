//! Session-backed cart.
//!
//! Each request copies the cart payload out of the session into a
//! [`SessionStorage`] snapshot, runs `CartStore` over it, and writes back the
//! keys the store changed. Concurrent requests of one session are
//! last-write-wins.
//!
//! Drawer visibility is kept in the session under its own key so that an
//! HTMX open/close survives the next fragment request. It is never part of
//! the persisted cart payload, and the storefront has no full-page route, so
//! a new session (the server-side "reload") always starts with the drawer
//! closed.

use std::collections::{BTreeSet, HashMap};

use smiley_day_core::cart::CartStore;
use smiley_day_core::{KeyValueStorage, StorageError};
use tower_sessions::Session;

use crate::error::Result;
use crate::models::session::keys;

/// In-memory copy of selected session keys.
///
/// Reads and writes are synchronous so `CartStore` can use it as its
/// storage; [`SessionStorage::commit`] flushes writes to the session.
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    entries: HashMap<String, String>,
    dirty: BTreeSet<String>,
}

impl SessionStorage {
    /// Snapshot `keys` from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(
        session: &Session,
        keys: &[&str],
    ) -> std::result::Result<Self, tower_sessions::session::Error> {
        let mut entries = HashMap::new();
        for key in keys {
            if let Some(value) = session.get::<String>(key).await? {
                entries.insert((*key).to_string(), value);
            }
        }

        Ok(Self {
            entries,
            dirty: BTreeSet::new(),
        })
    }

    /// Write every changed key back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects a write.
    pub async fn commit(
        &self,
        session: &Session,
    ) -> std::result::Result<(), tower_sessions::session::Error> {
        for key in &self.dirty {
            if let Some(value) = self.entries.get(key) {
                session.insert(key, value).await?;
            }
        }
        Ok(())
    }

    /// Whether any key was written since the snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

impl KeyValueStorage for SessionStorage {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> std::result::Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.dirty.insert(key.to_string());
        Ok(())
    }
}

/// A request's view of the session cart.
pub struct CartSession {
    session: Session,
    cart: CartStore<SessionStorage>,
}

impl CartSession {
    /// Rehydrate the cart and drawer visibility from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self> {
        let storage = SessionStorage::load(&session, &[keys::CART]).await?;
        let mut cart = CartStore::load_with_key(storage, keys::CART);

        let open = session.get::<bool>(keys::CART_OPEN).await?.unwrap_or(false);
        cart.set_open(open);

        Ok(Self { session, cart })
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<SessionStorage> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore<SessionStorage> {
        &mut self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Write the cart payload (when changed) and drawer visibility back.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects a write.
    pub async fn commit(&self) -> Result<()> {
        if self.cart.storage().is_dirty() {
            self.cart.storage().commit(&self.session).await?;
        }
        self.session
            .insert(keys::CART_OPEN, self.cart.is_open())
            .await?;
        Ok(())
    }
}
