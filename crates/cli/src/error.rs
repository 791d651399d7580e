//! Shell error types.

use std::path::PathBuf;

use cart::{CartError, ProductId};
use checkout::{AuthError, CheckoutError};
use thiserror::Error;

/// Errors surfaced to the shell user.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog seed file could not be read.
    #[error("Cannot read catalog {}: {source}", .path.display())]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The catalog seed file is not valid.
    #[error("Invalid catalog {}: {source}", .path.display())]
    CatalogFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No product with this id in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A cart operation was refused.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Sign-in failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::CatalogIo { .. } | CliError::CatalogFormat { .. } => 3,
            CliError::Checkout(CheckoutError::Collaborator { .. }) => 4,
            _ => 2,
        }
    }
}
