//! Product catalog trait and in-memory implementation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use cart::{Product, ProductId};

use crate::error::ServiceError;

/// Backend owning the authoritative product stock.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches a product, or `None` if it no longer exists.
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ServiceError>;

    /// Removes `quantity` units from stock and returns the updated product.
    ///
    /// Either the whole decrement is applied or none of it is.
    async fn decrement_stock(&self, id: &ProductId, quantity: u32)
    -> Result<Product, ServiceError>;
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    fail_on_get: bool,
    fail_on_decrement: HashSet<ProductId>,
    decrement_calls: usize,
}

/// In-memory product catalog for tests and the command-line shell.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
    decrement_delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

fn poisoned() -> ServiceError {
    ServiceError::Unavailable("catalog lock poisoned".to_string())
}

impl InMemoryProductCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    /// Makes every decrement wait `delay` before applying, to observe overlap.
    pub fn with_decrement_delay(mut self, delay: Duration) -> Self {
        self.decrement_delay = Some(delay);
        self
    }

    /// Inserts or replaces a product.
    pub fn upsert(&self, product: Product) {
        if let Ok(mut state) = self.state.write() {
            state.products.insert(product.id.clone(), product);
        }
    }

    /// Deletes a product.
    pub fn delete(&self, id: &ProductId) {
        if let Ok(mut state) = self.state.write() {
            state.products.remove(id);
        }
    }

    /// Configures lookups to fail.
    pub fn set_fail_on_get(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_get = fail;
        }
    }

    /// Configures decrements of `id` to fail.
    pub fn set_fail_on_decrement(&self, id: impl Into<ProductId>, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            let id = id.into();
            if fail {
                state.fail_on_decrement.insert(id);
            } else {
                state.fail_on_decrement.remove(&id);
            }
        }
    }

    /// Returns the current stock of a product.
    pub fn stock_of(&self, id: &ProductId) -> Option<u32> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.products.get(id).map(|p| p.stock))
    }

    /// Returns every product, sorted by id.
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .state
            .read()
            .map(|state| state.products.values().cloned().collect())
            .unwrap_or_default();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }

    /// Returns how many decrement requests were received.
    pub fn decrement_calls(&self) -> usize {
        self.state.read().map(|s| s.decrement_calls).unwrap_or(0)
    }

    /// Returns the highest number of decrements observed in flight at once.
    pub fn max_concurrent_decrements(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, ServiceError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        if state.fail_on_get {
            return Err(ServiceError::Unavailable("catalog offline".to_string()));
        }
        Ok(state.products.get(id).cloned())
    }

    async fn decrement_stock(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<Product, ServiceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.decrement_delay {
            tokio::time::sleep(delay).await;
        }

        let result = self.apply_decrement(id, quantity);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl InMemoryProductCatalog {
    fn apply_decrement(&self, id: &ProductId, quantity: u32) -> Result<Product, ServiceError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.decrement_calls += 1;

        if state.fail_on_decrement.contains(id) {
            return Err(ServiceError::Unavailable(format!(
                "stock update for {id} failed"
            )));
        }

        let product = state
            .products
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;

        product.stock = product.stock.checked_sub(quantity).ok_or_else(|| {
            ServiceError::Rejected(format!(
                "cannot remove {quantity} units of {id}, only {} left",
                product.stock
            ))
        })?;

        Ok(product.clone())
    }
}
