use async_trait::async_trait;

use crate::{Order, Result, Version};
use common::{OrderId, UserEmail};

/// Core trait for order record store implementations.
///
/// The store owns order records once created. It must support atomic
/// read-modify-write on a single order: `get_for_update` hands out the
/// record together with a version token, and `update` only succeeds if
/// that token still matches the stored record. All implementations must
/// be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order and returns its ID.
    ///
    /// Fails with `AlreadyExists` if a record with the same ID is present.
    async fn create(&self, order: Order) -> Result<OrderId>;

    /// Retrieves an order by ID.
    ///
    /// Returns None if the order doesn't exist.
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Retrieves an order together with its current version token, for a
    /// subsequent conditional `update`.
    ///
    /// Fails with `NotFound` if the order doesn't exist.
    async fn get_for_update(&self, order_id: OrderId) -> Result<(Order, Version)>;

    /// Writes back an order, conditional on `expected` matching the stored
    /// version.
    ///
    /// On success the stored version is incremented and returned. A
    /// mismatch fails with `ConcurrencyConflict` and leaves the record
    /// untouched; the caller must re-read and retry.
    async fn update(&self, order: Order, expected: Version) -> Result<Version>;

    /// Retrieves all orders belonging to a user, oldest first.
    async fn list_by_user(&self, user_email: &UserEmail) -> Result<Vec<Order>>;

    /// Retrieves all orders in the store, oldest first.
    async fn list_all(&self) -> Result<Vec<Order>>;
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderStoreExt: OrderStore {
    /// Checks if an order exists.
    async fn exists(&self, order_id: OrderId) -> Result<bool> {
        Ok(self.get(order_id).await?.is_some())
    }
}

// Blanket implementation for all OrderStore implementations
impl<T: OrderStore + ?Sized> OrderStoreExt for T {}
