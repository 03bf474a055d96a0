//! API server entry point.

use domain::{InMemoryCatalog, Product, RuleSet, TransitionPolicy};
use order_store::InMemoryOrderStore;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn load_rules(path: Option<&str>) -> RuleSet {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read rule set from {path}: {e}"));
            RuleSet::from_json(&json)
                .unwrap_or_else(|e| panic!("failed to parse rule set from {path}: {e}"))
        }
        None => RuleSet::storefront_defaults(),
    }
}

async fn load_catalog(path: Option<&str>) -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    if let Some(path) = path {
        let json = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("failed to read catalog from {path}: {e}"));
        let products: Vec<Product> = serde_json::from_str(&json)
            .unwrap_or_else(|e| panic!("failed to parse catalog from {path}: {e}"));
        for product in products {
            catalog.insert(product).await;
        }
    }
    catalog
}

#[tokio::main]
async fn main() {
    let config = api::config::Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Load the rule set and catalog, build application state
    let rules = load_rules(config.rules_path.as_deref());
    let catalog = load_catalog(config.catalog_path.as_deref()).await;
    let policy = config
        .cancel_window_hours
        .map(TransitionPolicy::with_cancel_window)
        .unwrap_or_default();

    tracing::info!(
        rules = rules.len(),
        products = catalog.product_count().await,
        "engine configured"
    );

    let state = api::create_state(InMemoryOrderStore::new(), catalog, rules, policy);

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting order engine API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
