//! Backend collaborator traits and in-memory implementations.

pub mod identity;
pub mod orders;
pub mod products;

pub use identity::{IdentityProvider, MockUser, MockUserDirectory, SessionIdentity};
pub use orders::{InMemoryOrderService, NewOrder, Order, OrderLine, OrderService, OrderStatus};
pub use products::{InMemoryProductCatalog, ProductCatalog};
