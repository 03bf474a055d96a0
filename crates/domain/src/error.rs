//! Domain error types.

use thiserror::Error;

use order_store::StoreError;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::order::OrderError;
use crate::rules::Violation;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The cart failed rule validation; carries the full violation list.
    #[error("order validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// The submitted cart operations were malformed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// An illegal lifecycle transition was requested.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// An error occurred in the order record store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An error occurred resolving products against the catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
