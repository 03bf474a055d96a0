use std::collections::HashMap;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    CartOp, InMemoryCatalog, Money, OrderAction, OrderService, Product, ProductId, RuleSet,
    UserEmail, cart, validate,
};
use order_store::InMemoryOrderStore;

fn sample_ops(n: usize) -> Vec<CartOp> {
    (0..n)
        .map(|i| CartOp::add(format!("SKU-{:03}", i % 8), 1))
        .collect()
}

fn sample_products() -> HashMap<ProductId, Product> {
    (0..8)
        .map(|i| {
            let id = ProductId::new(format!("SKU-{i:03}"));
            let product = Product::new(
                id.clone(),
                format!("Product {i}"),
                if i % 2 == 0 { "Solid" } else { "Liquid" },
                0.5,
                Money::from_cents(100 * (i as i64 + 1)),
                1000,
            );
            (id, product)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let ops = sample_ops(64);

    c.bench_function("engine/aggregate_64_ops", |b| {
        b.iter(|| cart::aggregate(&ops).unwrap());
    });
}

fn bench_validate(c: &mut Criterion) {
    let lines = cart::aggregate(&sample_ops(64)).unwrap();
    let products = sample_products();
    let rules = RuleSet::storefront_defaults();

    c.bench_function("engine/validate_default_rules", |b| {
        b.iter(|| {
            let _ = validate(&lines, &products, &rules);
        });
    });
}

fn bench_create_and_transition(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let catalog = InMemoryCatalog::new();
    rt.block_on(async {
        for product in sample_products().into_values() {
            catalog.insert(product).await;
        }
    });

    let service = OrderService::new(
        InMemoryOrderStore::new(),
        catalog,
        Arc::new(RuleSet::empty()),
    );

    c.bench_function("engine/create_process_ship", |b| {
        b.iter(|| {
            rt.block_on(async {
                let order = service
                    .create_order(
                        UserEmail::new("bench@example.com"),
                        vec![CartOp::add("SKU-000", 1)],
                    )
                    .await
                    .unwrap();
                service
                    .transition(order.id, OrderAction::Process)
                    .await
                    .unwrap();
                service.transition(order.id, OrderAction::Ship).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_validate,
    bench_create_and_transition
);
criterion_main!(benches);
