use thiserror::Error;

use crate::Version;
use common::OrderId;

/// Errors that can occur when interacting with the order record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrency conflict occurred when writing an order.
    /// The version presented by the writer did not match the stored version.
    #[error("concurrency conflict for order {order_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        order_id: OrderId,
        expected: Version,
        actual: Version,
    },

    /// The order was not found in the store.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// An order with this ID already exists.
    #[error("order already exists: {0}")]
    AlreadyExists(OrderId),

    /// The store could not be reached or answered with a transport-level
    /// failure. Never reinterpreted as a business outcome.
    #[error("order store unavailable: {0}")]
    Unavailable(String),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
