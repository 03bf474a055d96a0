//! Order service: the engine's write path against the catalog and the
//! record store.

use std::sync::Arc;

use chrono::Utc;

use common::{OrderId, ProductId, UserEmail};
use order_store::{Order, OrderStore, StoreError};

use crate::cart::{self, CartOp};
use crate::catalog::CatalogLookup;
use crate::error::DomainError;
use crate::rules::{RuleSet, validate};

use super::{OrderAction, TransitionPolicy, machine};

/// Service for creating orders and moving them through their lifecycle.
///
/// Creation aggregates the submitted cart, resolves product snapshots,
/// validates the rule set, and persists an accepted order in PENDING.
/// Transitions perform a single read-modify-write against the store; a
/// concurrent writer surfaces as `ConcurrencyConflict` and retrying is
/// the caller's decision.
pub struct OrderService<S, C> {
    store: S,
    catalog: C,
    rules: Arc<RuleSet>,
    policy: TransitionPolicy,
}

impl<S: OrderStore, C: CatalogLookup> OrderService<S, C> {
    /// Creates a new order service with an unrestricted transition policy.
    pub fn new(store: S, catalog: C, rules: Arc<RuleSet>) -> Self {
        Self {
            store,
            catalog,
            rules,
            policy: TransitionPolicy::unrestricted(),
        }
    }

    /// Replaces the transition policy, builder-style.
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Creates a new order from a sequence of cart operations.
    ///
    /// On acceptance the order is persisted in PENDING status and
    /// returned. On rejection nothing is persisted and the full violation
    /// list is returned in `DomainError::Validation`.
    #[tracing::instrument(skip(self, ops), fields(user = %user_email))]
    pub async fn create_order(
        &self,
        user_email: UserEmail,
        ops: Vec<CartOp>,
    ) -> Result<Order, DomainError> {
        let lines = cart::aggregate(&ops)?;

        let product_ids: Vec<ProductId> =
            lines.iter().map(|line| line.product_id.clone()).collect();
        let products = self.catalog.resolve_many(&product_ids).await?;

        if let Err(violations) = validate(&lines, &products, &self.rules) {
            metrics::counter!("order_validation_failures_total").increment(1);
            tracing::info!(count = violations.len(), "cart rejected");
            return Err(DomainError::Validation(violations));
        }

        let order = Order::new(OrderId::new(), user_email, lines, Utc::now());
        self.store.create(order.clone()).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, "order created");
        Ok(order)
    }

    /// Applies a lifecycle action to an order and writes the result back.
    ///
    /// Exactly one read-modify-write: the order is read with its version
    /// token, the transition validated, and the update is conditional on
    /// the token. A conflicting concurrent write fails the call; the
    /// state machine is re-evaluated on retry, never bypassed.
    #[tracing::instrument(skip(self))]
    pub async fn transition(
        &self,
        order_id: OrderId,
        action: OrderAction,
    ) -> Result<Order, DomainError> {
        let (order, version) = self.store.get_for_update(order_id).await?;
        let updated = machine::apply(&order, action, Utc::now(), &self.policy)?;

        match self.store.update(updated.clone(), version).await {
            Ok(_) => {
                metrics::counter!("order_transitions_total").increment(1);
                tracing::info!(order_id = %order_id, %action, status = %updated.status, "order transitioned");
                Ok(updated)
            }
            Err(err @ StoreError::ConcurrencyConflict { .. }) => {
                metrics::counter!("order_transition_conflicts_total").increment(1);
                tracing::warn!(order_id = %order_id, %action, "concurrent modification detected");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Loads an order by ID, returning None if unknown.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.store.get(order_id).await?)
    }

    /// Returns all orders belonging to a user, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_user(&self, user_email: &UserEmail) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list_by_user(user_email).await?)
    }

    /// Returns every order in the store, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, Product};
    use crate::order::OrderError;
    use crate::value_objects::Money;
    use order_store::{InMemoryOrderStore, OrderStatus};

    async fn stocked_catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog
            .insert(Product::new(
                "SKU-WATER",
                "Mineral Water",
                "Liquid",
                1.5,
                Money::from_cents(250),
                40,
            ))
            .await;
        catalog
            .insert(Product::new(
                "SKU-HELIUM",
                "Helium Canister",
                "Gaseous",
                2.0,
                Money::from_cents(4200),
                5,
            ))
            .await;
        catalog
            .insert(Product::new(
                "SKU-BRICK",
                "Clay Brick",
                "Solid",
                3.0,
                Money::from_cents(120),
                100,
            ))
            .await;
        catalog
    }

    async fn service() -> OrderService<InMemoryOrderStore, InMemoryCatalog> {
        OrderService::new(
            InMemoryOrderStore::new(),
            stocked_catalog().await,
            Arc::new(RuleSet::storefront_defaults()),
        )
    }

    fn ana() -> UserEmail {
        UserEmail::new("ana@example.com")
    }

    #[tokio::test]
    async fn accepted_cart_becomes_pending_order() {
        let service = service().await;

        let order = service
            .create_order(ana(), vec![CartOp::add("SKU-WATER", 2)])
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_quantity(), 2);
        assert!(order.confirmed_at.is_none());

        let stored = service.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored, order);
    }

    #[tokio::test]
    async fn rejected_cart_persists_nothing() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(
            store.clone(),
            stocked_catalog().await,
            Arc::new(RuleSet::storefront_defaults()),
        );

        // Liquid + Gaseous violates the incompatibility rule.
        let result = service
            .create_order(
                ana(),
                vec![CartOp::add("SKU-WATER", 1), CartOp::add("SKU-HELIUM", 1)],
            )
            .await;

        match result {
            Err(DomainError::Validation(violations)) => {
                assert_eq!(violations.len(), 1);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn resubmitting_a_rejected_cart_yields_the_same_violations() {
        let service = service().await;
        let ops = vec![CartOp::add("SKU-WATER", 1), CartOp::add("SKU-HELIUM", 1)];

        let first = match service.create_order(ana(), ops.clone()).await {
            Err(DomainError::Validation(v)) => v,
            other => panic!("expected validation failure, got {other:?}"),
        };
        let second = match service.create_order(ana(), ops).await {
            Err(DomainError::Validation(v)) => v,
            other => panic!("expected validation failure, got {other:?}"),
        };
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn full_lifecycle_to_sent() {
        let service = service().await;
        let order = service
            .create_order(ana(), vec![CartOp::add("SKU-BRICK", 3)])
            .await
            .unwrap();

        let confirmed = service
            .transition(order.id, OrderAction::Process)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::InProcess);
        assert!(confirmed.confirmed_at.is_some());

        let sent = service.transition(order.id, OrderAction::Ship).await.unwrap();
        assert_eq!(sent.status, OrderStatus::Sent);
        assert!(sent.sent_at.is_some());
        assert_eq!(sent.confirmed_at, confirmed.confirmed_at);
    }

    #[tokio::test]
    async fn cancel_then_process_fails_and_status_stays_cancelled() {
        let service = service().await;
        let order = service
            .create_order(ana(), vec![CartOp::add("SKU-BRICK", 1)])
            .await
            .unwrap();

        service
            .transition(order.id, OrderAction::Cancel)
            .await
            .unwrap();

        let result = service.transition(order.id, OrderAction::Process).await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidTransition { .. }))
        ));

        let stored = service.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn transition_on_unknown_order_is_not_found() {
        let service = service().await;
        let result = service.transition(OrderId::new(), OrderAction::Process).await;
        assert!(matches!(
            result,
            Err(DomainError::Store(StoreError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn catalog_outage_is_not_a_validation_failure() {
        let catalog = InMemoryCatalog::new();
        catalog.set_unavailable(true).await;
        let service = OrderService::new(
            InMemoryOrderStore::new(),
            catalog,
            Arc::new(RuleSet::storefront_defaults()),
        );

        let result = service
            .create_order(ana(), vec![CartOp::add("SKU-WATER", 1)])
            .await;
        assert!(matches!(result, Err(DomainError::Catalog(_))));
    }

    #[tokio::test]
    async fn orders_for_user_only_returns_that_users_orders() {
        let service = service().await;
        service
            .create_order(ana(), vec![CartOp::add("SKU-BRICK", 1)])
            .await
            .unwrap();
        service
            .create_order(
                UserEmail::new("bob@example.com"),
                vec![CartOp::add("SKU-BRICK", 2)],
            )
            .await
            .unwrap();

        let orders = service.orders_for_user(&ana()).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].user_email, ana());

        assert_eq!(service.all_orders().await.unwrap().len(), 2);
    }
}
