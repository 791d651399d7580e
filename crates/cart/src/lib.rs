//! Cart core for the storefront.
//!
//! This crate provides:
//! - [`CartStore`]: ordered line items, at most one per product
//! - [`guard`]: pure stock checks run before mutating the store
//! - [`PersistenceBridge`]: write-through to local storage and rehydration
//! - [`CartSession`]: the guarded, persisted cart a shopper interacts with

pub mod bridge;
pub mod error;
pub mod guard;
pub mod session;
pub mod store;
pub mod totals;
pub mod value_objects;

pub use bridge::{DEFAULT_CART_KEY, PersistenceBridge, StoredCart, StoredLineItem};
pub use error::{CartError, Result};
pub use session::CartSession;
pub use store::CartStore;
pub use totals::{TAX_RATE_PERCENT, Totals};
pub use value_objects::{LineItem, Money, Product, ProductId};
