//! Checkout for the storefront cart.
//!
//! The checkout sequencer takes the product catalog, the order service
//! and the shopper's identity as explicit collaborators, then:
//! 1. re-validates the cart against live stock
//! 2. decrements stock for every line concurrently
//! 3. creates the order
//! 4. clears the cart
//!
//! Partial stock decrements are not compensated when a later step fails.

pub mod error;
pub mod sequencer;
pub mod services;
pub mod steps;

pub use error::{AuthError, CheckoutError, Result, ServiceError};
pub use sequencer::CheckoutSequencer;
pub use services::{
    IdentityProvider, InMemoryOrderService, InMemoryProductCatalog, MockUser, MockUserDirectory,
    NewOrder, Order, OrderLine, OrderService, OrderStatus, ProductCatalog, SessionIdentity,
};
