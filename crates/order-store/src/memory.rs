use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Order, Result, StoreError, Version,
    store::OrderStore,
};
use common::{OrderId, UserEmail};

#[derive(Default)]
struct InMemoryState {
    orders: HashMap<OrderId, (Order, Version)>,
    unavailable: bool,
}

/// In-memory order store implementation for tests and local runs.
///
/// Provides the same conditional-write semantics a transactional backend
/// would: the stored version must match the writer's token, and each
/// successful write increments it.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Configures the store to fail every call with `Unavailable`, for
    /// exercising dependency-failure paths in tests.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.state.write().await.orders.clear();
    }
}

fn check_available(state: &InMemoryState) -> Result<()> {
    if state.unavailable {
        return Err(StoreError::Unavailable("store offline".to_string()));
    }
    Ok(())
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<OrderId> {
        let mut state = self.state.write().await;
        check_available(&state)?;

        let order_id = order.id;
        if state.orders.contains_key(&order_id) {
            return Err(StoreError::AlreadyExists(order_id));
        }

        state.orders.insert(order_id, (order, Version::first()));
        Ok(order_id)
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        check_available(&state)?;
        Ok(state.orders.get(&order_id).map(|(order, _)| order.clone()))
    }

    async fn get_for_update(&self, order_id: OrderId) -> Result<(Order, Version)> {
        let state = self.state.read().await;
        check_available(&state)?;
        state
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::NotFound(order_id))
    }

    async fn update(&self, order: Order, expected: Version) -> Result<Version> {
        let mut state = self.state.write().await;
        check_available(&state)?;

        let order_id = order.id;
        let entry = state
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::NotFound(order_id))?;

        let (_, current) = entry;
        if *current != expected {
            tracing::warn!(%order_id, %expected, actual = %current, "conditional write rejected");
            return Err(StoreError::ConcurrencyConflict {
                order_id,
                expected,
                actual: *current,
            });
        }

        let new_version = current.next();
        *entry = (order, new_version);
        Ok(new_version)
    }

    async fn list_by_user(&self, user_email: &UserEmail) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        check_available(&state)?;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|(order, _)| &order.user_email == user_email)
            .map(|(order, _)| order.clone())
            .collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        check_available(&state)?;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .map(|(order, _)| order.clone())
            .collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }
}
