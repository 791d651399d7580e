//! Guarded cart session.

use storage::LocalStorage;

use crate::bridge::PersistenceBridge;
use crate::error::{CartError, Result};
use crate::guard;
use crate::store::CartStore;
use crate::totals::Totals;
use crate::value_objects::{Product, ProductId};

/// A shopper's cart for the lifetime of one session.
///
/// Every mutation is checked against the stock guard first and written
/// through to storage afterwards. Storage failures never fail a mutation:
/// the in-memory cart stays authoritative and [`CartSession::is_dirty`]
/// reports that the saved copy is behind.
#[derive(Debug)]
pub struct CartSession<S: LocalStorage> {
    store: CartStore,
    bridge: PersistenceBridge<S>,
    dirty: bool,
}

impl<S: LocalStorage> CartSession<S> {
    /// Opens a session, restoring any saved cart.
    pub fn open(bridge: PersistenceBridge<S>) -> Self {
        let store = bridge.load();
        Self {
            store,
            bridge,
            dirty: false,
        }
    }

    /// Returns the current cart contents.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Returns the current totals.
    pub fn totals(&self) -> Totals {
        self.store.totals()
    }

    /// Returns true if the last write-through failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Adds `quantity` units of a product if its stock allows it.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_product(&mut self, product: &Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        if !guard::can_add(&self.store, product, quantity) {
            return Err(CartError::InsufficientStock {
                product_id: product.id.clone(),
                requested: guard::requested_total(&self.store, product, quantity),
                available: product.stock,
            });
        }

        self.store.add(product, quantity)?;
        self.persist();
        Ok(())
    }

    /// Sets a line's quantity if its stock allows it. Absent products are ignored.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn update_quantity(&mut self, product: &Product, quantity: u32) -> Result<()> {
        if !guard::can_set_quantity(product, quantity) {
            return Err(CartError::InsufficientStock {
                product_id: product.id.clone(),
                requested: u64::from(quantity),
                available: product.stock,
            });
        }

        if self.store.set_quantity(&product.id, quantity) {
            self.persist();
        }
        Ok(())
    }

    /// Removes a product's line. Returns false if there was none.
    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let removed = self.store.remove(product_id);
        if removed {
            self.persist();
        }
        removed
    }

    /// Empties the cart.
    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) {
        self.store.clear();
        self.persist();
    }

    fn persist(&mut self) {
        match self.bridge.save(&self.store) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                metrics::counter!("cart_persist_failures_total").increment(1);
                tracing::warn!(error = %e, key = self.bridge.key(), "cart write-through failed");
                self.dirty = true;
            }
        }
    }
}
