//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart (`CartStore` over a session snapshot)
//! - `notifications` - Session-backed toast queue

pub mod cart;
pub mod notifications;

pub use cart::{CartSession, SessionStorage};
