//! Persistence bridge: mirrors the cart to local storage and rehydrates it.

use serde::{Deserialize, Serialize};
use storage::LocalStorage;

use crate::error::Result;
use crate::store::CartStore;
use crate::value_objects::{LineItem, Money, Product, ProductId};

/// Storage key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Persisted form of the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCart {
    pub items: Vec<StoredLineItem>,
}

/// Persisted form of a line item.
///
/// Only `id` and `quantity` are required; everything else falls back to
/// a default so payloads written by older versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLineItem {
    pub id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl StoredLineItem {
    fn product(&self) -> Product {
        Product {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            artist: self.artist.clone(),
            image: self.image.clone(),
        }
    }
}

impl From<&LineItem> for StoredLineItem {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.product_id.clone(),
            quantity: item.quantity,
            name: item.name.clone(),
            price: item.unit_price,
            stock: item.stock,
            artist: item.artist.clone(),
            image: item.image.clone(),
        }
    }
}

impl From<&CartStore> for StoredCart {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.items().iter().map(StoredLineItem::from).collect(),
        }
    }
}

/// Writes the cart through to local storage and reads it back at startup.
#[derive(Debug, Clone)]
pub struct PersistenceBridge<S: LocalStorage> {
    storage: S,
    key: String,
}

impl<S: LocalStorage> PersistenceBridge<S> {
    /// Creates a bridge using [`DEFAULT_CART_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    /// Creates a bridge persisting under `key`.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rehydrates a cart from storage.
    ///
    /// Never fails: an absent payload yields an empty cart, an unreadable
    /// one is logged and yields an empty cart, and a malformed one is
    /// additionally erased from storage.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> CartStore {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartStore::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved cart, starting empty");
                return CartStore::new();
            }
        };

        let stored: StoredCart = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed saved cart");
                if let Err(e) = self.storage.remove(&self.key) {
                    tracing::warn!(error = %e, "could not erase malformed saved cart");
                }
                return CartStore::new();
            }
        };

        let mut cart = CartStore::new();
        for record in &stored.items {
            if record.quantity == 0 {
                continue;
            }
            // Replay the same way a shopper would build the cart.
            if cart.add(&record.product(), 1).is_ok() {
                cart.set_quantity(&record.id, record.quantity);
            }
        }

        tracing::debug!(lines = cart.len(), "saved cart restored");
        cart
    }

    /// Serializes the cart and writes it to storage.
    pub fn save(&self, cart: &CartStore) -> Result<()> {
        let payload = serde_json::to_string(&StoredCart::from(cart))?;
        self.storage.set(&self.key, &payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStorage;

    #[test]
    fn test_load_missing_payload_is_empty() {
        let bridge = PersistenceBridge::new(InMemoryStorage::new());
        assert!(bridge.load().is_empty());
    }

    #[test]
    fn test_load_minimal_payload() {
        let storage = InMemoryStorage::with_entry("cart", r#"{"items":[{"id":"p1","quantity":2}]}"#);
        let cart = PersistenceBridge::new(storage).load();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&"p1".into()), 2);
    }

    #[test]
    fn test_load_merges_duplicate_records_by_id() {
        let storage = InMemoryStorage::with_entry(
            "cart",
            r#"{"items":[{"id":"p1","quantity":2},{"id":"p2","quantity":1},{"id":"p1","quantity":5}]}"#,
        );
        let cart = PersistenceBridge::new(storage).load();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of(&"p1".into()), 5);
    }

    #[test]
    fn test_malformed_payload_is_discarded_and_erased() {
        for raw in [
            "not json",
            r#"{"items":"nope"}"#,
            r#"{"items":[{"quantity":1}]}"#,
            r#"[{"id":"p1","quantity":1}]"#,
            r#"{"items":[{"id":"p1","quantity":-1}]}"#,
        ] {
            let storage = InMemoryStorage::with_entry("cart", raw);
            let cart = PersistenceBridge::new(storage.clone()).load();

            assert!(cart.is_empty(), "payload {raw:?} should be discarded");
            assert_eq!(storage.peek("cart"), None, "payload {raw:?} should be erased");
        }
    }

    #[test]
    fn test_read_failure_yields_empty_cart_and_keeps_entry() {
        let storage = InMemoryStorage::with_entry("cart", r#"{"items":[]}"#);
        storage.set_fail_on_read(true);

        assert!(PersistenceBridge::new(storage.clone()).load().is_empty());
        assert!(storage.peek("cart").is_some());
    }

    #[test]
    fn test_save_then_load_preserves_lines() {
        let storage = InMemoryStorage::new();
        let bridge = PersistenceBridge::with_key(storage, "cart_u1");

        let mut cart = CartStore::new();
        cart.add(
            &Product::new("p1", "Print", Money::from_major(1000), 3).with_artist("Ada"),
            2,
        )
        .unwrap();
        cart.add(&Product::new("p2", "Poster", Money::from_cents(1999), 8), 1)
            .unwrap();
        bridge.save(&cart).unwrap();

        assert_eq!(bridge.load(), cart);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let storage = InMemoryStorage::new();
        storage.set_fail_on_write(true);
        let bridge = PersistenceBridge::new(storage);

        assert!(bridge.save(&CartStore::new()).is_err());
    }
}
