//! Checkout step names, used in errors and logs.

/// Step name: fetch live products and re-check stock.
pub const STEP_VERIFY_STOCK: &str = "verify_stock";

/// Step name: decrement stock for every line.
pub const STEP_DECREMENT_STOCK: &str = "decrement_stock";

/// Step name: record the order.
pub const STEP_CREATE_ORDER: &str = "create_order";
