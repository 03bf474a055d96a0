//! Domain layer for the storefront order engine.
//!
//! This crate provides the engine's core components:
//! - Cart aggregation into canonical order lines
//! - Business-rule validation of candidate carts
//! - The order status state machine
//! - `OrderService` orchestrating them against a catalog and a record store

pub mod cart;
pub mod catalog;
pub mod error;
pub mod order;
pub mod rules;
pub mod value_objects;

pub use cart::{CartError, CartOp};
pub use catalog::{CatalogError, CatalogLookup, InMemoryCatalog, Product};
pub use error::DomainError;
pub use order::{OrderAction, OrderError, OrderService, TransitionPolicy};
pub use rules::{MaxItemsScope, OrderRule, RuleCriteria, RuleId, RuleSet, Violation, validate};
pub use value_objects::Money;

pub use common::{OrderId, ProductId, UserEmail};
pub use order_store::{Order, OrderLine, OrderStatus, Version};
