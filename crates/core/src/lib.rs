//! Smiley Day Core - cart state and shared storefront types.
//!
//! This crate provides the pieces of the storefront that hold real
//! invariants:
//! - `cart` - Cart store with identity merging, quantity bounds and persistence
//! - `catalog` - Normalized products, color swatches and listing filters
//! - `notify` - Toast notification queue
//! - `storage` - Key-value storage backends used for persisted client state
//!
//! # Architecture
//!
//! The core crate has no network access and no async runtime. Everything is
//! synchronous and test-constructible; the storefront binary wires it to
//! HTTP sessions and the Shopify catalog.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and price formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod notify;
pub mod storage;
pub mod types;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use types::*;
