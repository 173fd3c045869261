use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;
use tokio::runtime::Runtime;

use storefront_core::{ItemId, Money, OrderId, ProductId};
use storefront_inventory::{InMemoryProductStore, ReservationEngine, ReservationLockRegistry};

type Engine = ReservationEngine<Arc<InMemoryProductStore>>;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .build()
        .expect("failed to build tokio runtime")
}

/// One engine with `products` products of `items_per_product` free items each.
fn seeded(rt: &Runtime, products: usize, items_per_product: usize) -> Arc<Engine> {
    let engine = Arc::new(ReservationEngine::new(
        Arc::new(InMemoryProductStore::new()),
        Arc::new(ReservationLockRegistry::new()),
    ));
    rt.block_on(async {
        for p in 0..products {
            let product_id = ProductId::new(format!("prod-{p}"));
            engine
                .register_product(&product_id, "Bench product", Money::new(dec!(10)))
                .await
                .unwrap();
            let items = (0..items_per_product)
                .map(|i| ItemId::new(format!("prod-{p}-item-{i}")))
                .collect();
            engine.stock_items(&product_id, items).await.unwrap();
        }
    });
    engine
}

/// Many tasks reserving one item each, all against one product vs spread over many.
fn bench_contended_reservations(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("reserve_64_tasks");
    group.throughput(Throughput::Elements(64));

    for products in [1usize, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(products), &products, |b, &products| {
            b.iter_batched(
                || seeded(&rt, products, 64),
                |engine| {
                    rt.block_on(async {
                        let tasks: Vec<_> = (0..64)
                            .map(|i| {
                                let engine = engine.clone();
                                tokio::spawn(async move {
                                    let product_id = ProductId::new(format!("prod-{}", i % products));
                                    engine
                                        .reserve(
                                            &OrderId::new(format!("order-{i}")),
                                            &product_id,
                                            1,
                                            Money::new(dec!(10)),
                                        )
                                        .await
                                })
                            })
                            .collect();
                        for task in tasks {
                            black_box(task.await.unwrap().unwrap());
                        }
                    })
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_contended_reservations);
criterion_main!(benches);
