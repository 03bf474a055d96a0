//! HTTP API server with observability for the storefront order engine.
//!
//! Provides REST endpoints for order creation and lifecycle transitions,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::{CatalogLookup, OrderService, RuleSet, TransitionPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static, C: CatalogLookup + 'static>(
    state: Arc<AppState<S, C>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S, C>))
        .route("/orders", get(routes::orders::list::<S, C>))
        .route("/orders/{id}", get(routes::orders::get::<S, C>))
        .route("/orders/{id}/process", put(routes::orders::process::<S, C>))
        .route("/orders/{id}/ship", put(routes::orders::ship::<S, C>))
        .route("/orders/{id}/cancel", put(routes::orders::cancel::<S, C>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state from a store, a catalog, and the
/// load-once rule configuration.
pub fn create_state<S: OrderStore, C: CatalogLookup>(
    store: S,
    catalog: C,
    rules: RuleSet,
    policy: TransitionPolicy,
) -> Arc<AppState<S, C>> {
    Arc::new(AppState {
        orders: OrderService::new(store, catalog, Arc::new(rules)).with_policy(policy),
    })
}
