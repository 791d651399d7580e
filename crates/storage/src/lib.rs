//! Durable local storage for the storefront cart.
//!
//! Provides a small synchronous key-value abstraction ([`LocalStorage`])
//! with an in-memory implementation for tests and a file-backed one for
//! the command-line shell.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use store::LocalStorage;
