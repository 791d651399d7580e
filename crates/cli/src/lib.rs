//! Command-line shell for the gallery storefront.
//!
//! Each invocation loads the persisted cart from the data directory, applies
//! one command and saves the result. The catalog seed file provides the mock
//! product and user backend.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;

pub use catalog::CatalogSeed;
pub use commands::{Cli, Command, run};
pub use config::{Config, LogFormat};
pub use error::CliError;
