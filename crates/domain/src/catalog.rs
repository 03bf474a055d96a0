//! Catalog lookup boundary: product snapshots and the resolution trait.
//!
//! The catalog is owned and mutated elsewhere; the engine only reads
//! possibly-stale snapshots through [`CatalogLookup`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::value_objects::Money;
use common::ProductId;

/// A read-only snapshot of a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable product identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Category/type tag (e.g. "Liquid", "Solid", "Gaseous").
    #[serde(rename = "type")]
    pub kind: String,

    /// Weight per unit, non-negative.
    pub weight: f64,

    /// Price per unit.
    pub unit_price: Money,

    /// Quantity currently available.
    pub available: u32,

    /// Open-ended extra attributes.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Product {
    /// Creates a new product snapshot without extra attributes.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        kind: impl Into<String>,
        weight: f64,
        unit_price: Money,
        available: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            weight,
            unit_price,
            available,
            attributes: HashMap::new(),
        }
    }

    /// Adds an extra attribute, builder-style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Resolves a named attribute against the built-in fields first, then
    /// the extra-attribute map. Rules match on this merged view.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "type" => Some(self.kind.clone()),
            "weight" => Some(self.weight.to_string()),
            "price" => Some(self.unit_price.cents().to_string()),
            "quantity" => Some(self.available.to_string()),
            _ => self.attributes.get(name).cloned(),
        }
    }
}

/// Errors raised by catalog lookups.
///
/// Connectivity failures stay distinct from business outcomes; a product
/// that simply doesn't exist is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Trait for resolving product identifiers to catalog snapshots.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Resolves a single product, returning None if unknown.
    async fn resolve(&self, product_id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Resolves a batch of products, returning only those found.
    async fn resolve_many(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Product>, CatalogError> {
        let mut found = HashMap::with_capacity(product_ids.len());
        for product_id in product_ids {
            if let Some(product) = self.resolve(product_id).await? {
                found.insert(product_id.clone(), product);
            }
        }
        Ok(found)
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    unavailable: bool,
}

/// In-memory catalog for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product.
    pub async fn insert(&self, product: Product) {
        let mut state = self.state.write().await;
        state.products.insert(product.id.clone(), product);
    }

    /// Configures the catalog to fail every lookup with `Unavailable`,
    /// for exercising dependency-failure paths in tests.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Returns the number of known products.
    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn resolve(&self, product_id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let state = self.state.read().await;
        if state.unavailable {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        Ok(state.products.get(product_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Product {
        Product::new("SKU-WATER", "Mineral Water", "Liquid", 1.5, Money::from_cents(250), 40)
            .with_attribute("inflammable", "false")
    }

    #[tokio::test]
    async fn resolve_known_and_unknown_products() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(water()).await;

        let found = catalog.resolve(&ProductId::new("SKU-WATER")).await.unwrap();
        assert_eq!(found.unwrap().kind, "Liquid");

        let missing = catalog.resolve(&ProductId::new("SKU-NOPE")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn resolve_many_returns_only_found() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(water()).await;

        let ids = vec![ProductId::new("SKU-WATER"), ProductId::new("SKU-NOPE")];
        let found = catalog.resolve_many(&ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&ProductId::new("SKU-WATER")));
    }

    #[tokio::test]
    async fn unavailable_catalog_surfaces_as_error() {
        let catalog = InMemoryCatalog::new();
        catalog.set_unavailable(true).await;

        let result = catalog.resolve(&ProductId::new("SKU-WATER")).await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }

    #[test]
    fn attribute_view_merges_built_ins_and_extras() {
        let product = water();
        assert_eq!(product.attribute("type").as_deref(), Some("Liquid"));
        assert_eq!(product.attribute("weight").as_deref(), Some("1.5"));
        assert_eq!(product.attribute("inflammable").as_deref(), Some("false"));
        assert_eq!(product.attribute("color"), None);
    }

    #[test]
    fn product_serializes_kind_as_type() {
        let json = serde_json::to_value(water()).unwrap();
        assert_eq!(json["type"], "Liquid");
    }
}
