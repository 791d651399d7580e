//! Checkout error types.

use cart::ProductId;
use thiserror::Error;

/// Errors returned by backend collaborators.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The backend could not be reached or answered with a server error.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The product does not exist.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The backend refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Errors from the mock sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No user matches the email/password pair.
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No authenticated user.
    #[error("You must be signed in to check out")]
    NotSignedIn,

    /// There is nothing to check out.
    #[error("Cart is empty")]
    EmptyCart,

    /// Live stock no longer covers some lines.
    #[error("Insufficient stock for some items: {}", join_ids(.product_ids))]
    InsufficientStock { product_ids: Vec<ProductId> },

    /// A collaborator call failed.
    #[error("Checkout failed at step '{step}', please try again: {source}")]
    Collaborator {
        step: &'static str,
        source: ServiceError,
    },
}

impl CheckoutError {
    pub(crate) fn at_step(step: &'static str, source: ServiceError) -> Self {
        Self::Collaborator { step, source }
    }

    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CheckoutError::NotSignedIn => "not_signed_in",
            CheckoutError::EmptyCart => "empty_cart",
            CheckoutError::InsufficientStock { .. } => "insufficient_stock",
            CheckoutError::Collaborator { .. } => "collaborator",
        }
    }
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_lists_products() {
        let err = CheckoutError::InsufficientStock {
            product_ids: vec!["p1".into(), "p3".into()],
        };
        assert_eq!(err.to_string(), "Insufficient stock for some items: p1, p3");
        assert_eq!(err.reason(), "insufficient_stock");
    }

    #[test]
    fn test_collaborator_error_keeps_source() {
        let err = CheckoutError::at_step(
            "create_order",
            ServiceError::Unavailable("timeout".to_string()),
        );
        assert!(err.to_string().contains("create_order"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
