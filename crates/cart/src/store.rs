//! In-memory cart store.

use crate::error::{CartError, Result};
use crate::totals::Totals;
use crate::value_objects::{LineItem, Product, ProductId};

/// Ordered collection of line items, at most one per product.
///
/// Insertion order is display order. The store does not look at stock:
/// callers run the stock guard (see [`crate::guard`]) before mutating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<LineItem>,
}

// Query methods
impl CartStore {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the line items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the line for a product, if present.
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Returns the quantity of a product in the cart, 0 if absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity)
    }

    /// Returns true if the product has a line in the cart.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Computes the totals from the current lines.
    pub fn totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }
}

// Mutations
impl CartStore {
    /// Adds `quantity` units of a product.
    ///
    /// An existing line has its quantity incremented and its snapshot
    /// (name, price, stock, metadata) refreshed from `product`.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        match self.position(&product.id) {
            Some(index) => {
                let existing = &mut self.items[index];
                let merged = existing.quantity.saturating_add(quantity);
                *existing = LineItem::from_product(product, merged);
            }
            None => self.items.push(LineItem::from_product(product, quantity)),
        }
        Ok(())
    }

    /// Removes a product's line. Returns false if there was none.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        match self.position(product_id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the quantity of an existing line.
    ///
    /// Setting 0 removes the line. Returns false if the product is not in
    /// the cart (nothing changes).
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }

        match self.items.iter_mut().find(|item| &item.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Money;

    fn product(id: &str, stock: u32) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_major(1000), stock)
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 2).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&"p1".into()), 2);
    }

    #[test]
    fn test_add_existing_merges_quantity() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 2).unwrap();
        cart.add(&product("p1", 5), 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&"p1".into()), 3);
    }

    #[test]
    fn test_add_refreshes_snapshot() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 1).unwrap();
        cart.add(&product("p1", 9), 1).unwrap();

        assert_eq!(cart.get(&"p1".into()).unwrap().stock, 9);
    }

    #[test]
    fn test_add_zero_quantity_rejected() {
        let mut cart = CartStore::new();
        let result = cart.add(&product("p1", 5), 0);

        assert!(matches!(
            result,
            Err(CartError::InvalidQuantity { quantity: 0 })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = CartStore::new();
        cart.add(&product("b", 5), 1).unwrap();
        cart.add(&product("a", 5), 1).unwrap();
        cart.add(&product("b", 5), 1).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 1).unwrap();

        assert!(!cart.remove(&"p2".into()));
        assert_eq!(cart.len(), 1);
        assert!(cart.remove(&"p1".into()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 1).unwrap();

        assert!(cart.set_quantity(&"p1".into(), 4));
        assert_eq!(cart.quantity_of(&"p1".into()), 4);

        assert!(!cart.set_quantity(&"p2".into(), 4));
        assert!(!cart.contains(&"p2".into()));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 1).unwrap();

        assert!(cart.set_quantity(&"p1".into(), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 1).unwrap();
        cart.add(&product("p2", 5), 1).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.totals().count, 0);
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = CartStore::new();
        cart.add(&product("p1", 5), 2).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Money::from_major(2000));
        assert_eq!(totals.iva, Money::from_major(420));
        assert_eq!(totals.total, Money::from_major(2420));
        assert_eq!(totals.count, 2);
    }

    #[test]
    fn test_no_duplicate_ids_across_operation_sequence() {
        let mut cart = CartStore::new();
        let ids = ["p1", "p2", "p3"];

        for step in 0..60u32 {
            let id = ids[(step as usize * 7) % ids.len()];
            match step % 4 {
                0 | 1 => cart.add(&product(id, 100), step % 3 + 1).unwrap(),
                2 => {
                    cart.set_quantity(&id.into(), step % 5);
                }
                _ => {
                    cart.remove(&id.into());
                }
            }

            let mut seen: Vec<&ProductId> = cart.items().iter().map(|i| &i.product_id).collect();
            let before = seen.len();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), before, "duplicate line after step {step}");
            assert!(cart.items().iter().all(|i| i.quantity >= 1));

            let count: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
            assert_eq!(cart.totals().count, count);
        }
    }
}
