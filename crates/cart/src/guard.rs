//! Stock guard: pure checks of requested quantities against known stock.

use std::collections::HashMap;

use crate::store::CartStore;
use crate::value_objects::{Product, ProductId};

/// Returns true if adding `quantity` units keeps the cart within `product.stock`.
pub fn can_add(cart: &CartStore, product: &Product, quantity: u32) -> bool {
    requested_total(cart, product, quantity) <= u64::from(product.stock)
}

/// Quantity the product's line would hold after adding `quantity`.
pub fn requested_total(cart: &CartStore, product: &Product, quantity: u32) -> u64 {
    u64::from(cart.quantity_of(&product.id)) + u64::from(quantity)
}

/// Returns true if a line may be set to exactly `quantity` units.
pub fn can_set_quantity(product: &Product, quantity: u32) -> bool {
    quantity <= product.stock
}

/// Returns true if every line is covered by live stock.
///
/// A line whose product is missing from `live_products` fails the check.
pub fn can_checkout(cart: &CartStore, live_products: &[Product]) -> bool {
    stock_shortfalls(cart, live_products).is_empty()
}

/// Returns the ids of lines that live stock cannot cover, in cart order.
pub fn stock_shortfalls(cart: &CartStore, live_products: &[Product]) -> Vec<ProductId> {
    let live: HashMap<&ProductId, &Product> = live_products.iter().map(|p| (&p.id, p)).collect();

    cart.items()
        .iter()
        .filter(|item| {
            live.get(&item.product_id)
                .is_none_or(|product| item.quantity > product.stock)
        })
        .map(|item| item.product_id.clone())
        .collect()
}
